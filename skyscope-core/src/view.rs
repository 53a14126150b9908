//! Pieces shared by the view orchestrators.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    connectivity::Connectivity, geocode::Geocoder, preferences::Preferences,
    repository::WeatherRepository,
};

/// External services a view talks to.
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub repository: Arc<dyn WeatherRepository>,
    pub preferences: Preferences,
    pub connectivity: Arc<dyn Connectivity>,
    pub geocoder: Arc<dyn Geocoder>,
}

/// Liveness handle held by an orchestrator.
///
/// Results that arrive after the matching [`ViewGuard`] is dropped must not
/// touch display state.
#[derive(Debug, Clone)]
pub struct ViewScope {
    live: Arc<AtomicBool>,
}

/// Owned by whoever shows the view; dropping it closes the scope.
#[derive(Debug)]
#[must_use = "dropping the guard closes the view immediately"]
pub struct ViewGuard {
    live: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn open() -> (ViewScope, ViewGuard) {
        let live = Arc::new(AtomicBool::new(true));
        (ViewScope { live: live.clone() }, ViewGuard { live })
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl ViewGuard {
    pub fn close(self) {}
}

impl Drop for ViewGuard {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
    }
}

/// Transient, non-fatal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Offline,
    NoCachedData,
    NoResults,
    FavoriteFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Offline => f.write_str("You are offline"),
            Notice::NoCachedData => f.write_str("No cached weather available"),
            Notice::NoResults => f.write_str("No results found"),
            Notice::FavoriteFailed(message) => f.write_str(message),
        }
    }
}

/// Where the host should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Favorites,
}
