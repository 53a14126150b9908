//! Weather display for a saved favorite.
//!
//! `Loading -> Displayed | NoData`. Online entries refresh remotely using the
//! user's current unit/language preference; offline entries read the cached
//! snapshot and raise one [`Notice::Offline`].

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::{
    error::SkyError,
    format::{
        DailyRow, DisplayStrings, HourlyRow, format_daily, format_date, format_day_name,
        format_hourly, format_reading,
    },
    geocode::locate,
    icon::{IconId, resolve_icon},
    model::{Coordinate, FavoriteId, LocationCoordinate, WeatherSnapshot},
    units::UnitPreference,
    view::{Collaborators, Destination, Notice, ViewScope},
};

/// Entry parameters; `coordinate` is only needed for the online refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoriteArgs {
    pub id: FavoriteId,
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteDisplay {
    pub icon: IconId,
    pub day_name: String,
    pub date: String,
    pub description: String,
    pub location: LocationCoordinate,
    pub readings: DisplayStrings,
    pub hourly: Vec<HourlyRow>,
    pub daily: Vec<DailyRow>,
    pub units: UnitPreference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteViewState {
    Loading,
    Displayed(Box<FavoriteDisplay>),
    /// Offline and nothing cached for this favorite.
    NoData,
}

#[derive(Debug)]
pub struct FavoriteWeatherView {
    deps: Collaborators,
    scope: ViewScope,
    state: FavoriteViewState,
    notices: Vec<Notice>,
}

impl FavoriteWeatherView {
    pub fn new(deps: Collaborators, scope: ViewScope) -> Self {
        Self {
            deps,
            scope,
            state: FavoriteViewState::Loading,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> &FavoriteViewState {
        &self.state
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn back(&self) -> Destination {
        Destination::Favorites
    }

    /// Load and render weather for `args.id`. `now` drives the day/date header.
    pub async fn load(
        &mut self,
        args: FavoriteArgs,
        now: DateTime<Utc>,
    ) -> Result<&FavoriteViewState> {
        self.state = FavoriteViewState::Loading;

        let snapshot = if self.deps.connectivity.is_online().await {
            let coord = args.coordinate.ok_or(SkyError::MissingCoordinate(args.id))?;
            let units = self.deps.preferences.unit_preference()?;
            debug!(id = %args.id, %coord, "refreshing favorite online");
            Some(
                self.deps
                    .repository
                    .refresh_weather(coord, units, args.id)
                    .await?,
            )
        } else {
            info!(id = %args.id, "offline, reading cached weather");
            self.notices.push(Notice::Offline);
            self.deps.repository.favorite_weather(args.id).await?
        };

        if !self.scope.is_live() {
            debug!(id = %args.id, "view closed, discarding weather");
            return Ok(&self.state);
        }

        let Some(snapshot) = snapshot else {
            self.notices.push(Notice::NoCachedData);
            self.state = FavoriteViewState::NoData;
            return Ok(&self.state);
        };

        let display = self.render(&snapshot, now).await;
        if !self.scope.is_live() {
            debug!(id = %args.id, "view closed while resolving place name");
            return Ok(&self.state);
        }

        self.state = FavoriteViewState::Displayed(Box::new(display));
        Ok(&self.state)
    }

    async fn render(&self, snapshot: &WeatherSnapshot, now: DateTime<Utc>) -> FavoriteDisplay {
        let units = snapshot.units;
        let language = units.language;
        let tz: Tz = snapshot.timezone.parse().unwrap_or_else(|_| {
            debug!(zone = %snapshot.timezone, "unknown time zone, using UTC");
            Tz::UTC
        });
        let local_now = now.with_timezone(&tz);
        let reading = &snapshot.current;

        FavoriteDisplay {
            icon: resolve_icon(&reading.condition_code),
            day_name: format_day_name(&local_now, language),
            date: format_date(&local_now, language),
            description: reading.description.clone(),
            location: locate(self.deps.geocoder.as_ref(), reading.coordinate, language)
                .await,
            readings: format_reading(reading, units),
            hourly: format_hourly(&snapshot.hourly, units, &tz),
            daily: format_daily(&snapshot.daily, units, &tz),
            units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geocode::UNKNOWN_PLACE,
        preferences::{MemoryPreferenceStore, PrefKey, PreferenceStore, Preferences},
        testing::{FakeGeocoder, FakeRepository, RepoCall, collaborators, snapshot},
        units::{Language, UnitSystem},
    };
    use chrono::TimeZone;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 10, 15, 30, 0).unwrap()
    }

    fn args() -> FavoriteArgs {
        FavoriteArgs {
            id: FavoriteId(4),
            coordinate: Some(Coordinate::new(10.0, 20.0)),
        }
    }

    #[tokio::test]
    async fn online_refreshes_with_current_preferences() {
        let repo = Arc::new(FakeRepository::default());
        let geocoder = Arc::new(FakeGeocoder {
            place_name: Some("Cairo Governorate, Egypt".into()),
            ..FakeGeocoder::default()
        });
        let (deps, prefs) = collaborators(repo.clone(), geocoder, true);
        prefs.set_unit_system(UnitSystem::Imperial).unwrap();

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        view.load(args(), now()).await.unwrap();

        let units = UnitPreference::new(UnitSystem::Imperial, Language::En);
        assert_eq!(
            repo.calls(),
            vec![RepoCall::Refresh(Coordinate::new(10.0, 20.0), units, FavoriteId(4))]
        );

        let FavoriteViewState::Displayed(display) = view.state() else {
            panic!("expected displayed state, got {:?}", view.state());
        };
        assert_eq!(display.icon, IconId::ClearSkyDay);
        assert_eq!(display.day_name, "Monday");
        assert_eq!(display.date, "10 Apr, 2023");
        assert_eq!(display.location.name, "Cairo Governorate, Egypt");
        assert_eq!(display.readings.temperature, "23°F");
        assert_eq!(display.readings.wind_speed, "3.6 miles/h");
        assert_eq!(display.hourly.len(), 1);
        assert_eq!(display.daily[0].temperature, "27/15°F");
        assert!(view.take_notices().is_empty());
    }

    #[tokio::test]
    async fn offline_reads_cache_only_with_one_notice() {
        let cached_units = UnitPreference::new(UnitSystem::Metric, Language::Ar);
        let repo = Arc::new(FakeRepository::default());
        *repo.cached.lock() = Some(snapshot(cached_units));
        let (deps, _prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), false);

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        view.load(args(), now()).await.unwrap();

        assert_eq!(repo.calls(), vec![RepoCall::Cached(FavoriteId(4))]);
        assert_eq!(view.take_notices(), vec![Notice::Offline]);

        let FavoriteViewState::Displayed(display) = view.state() else {
            panic!("expected displayed state");
        };
        // Display follows the units the snapshot was fetched in.
        assert_eq!(display.units, cached_units);
        assert_eq!(display.readings.temperature, "٢٣ °م");
    }

    #[tokio::test]
    async fn offline_without_cache_ends_in_no_data() {
        let repo = Arc::new(FakeRepository::default());
        let (deps, _prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), false);

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        let state = view.load(args(), now()).await.unwrap();

        assert_eq!(state, &FavoriteViewState::NoData);
        assert_eq!(view.take_notices(), vec![Notice::Offline, Notice::NoCachedData]);
    }

    #[tokio::test]
    async fn online_without_coordinate_is_an_error() {
        let repo = Arc::new(FakeRepository::default());
        let (deps, _prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), true);

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        let args = FavoriteArgs {
            id: FavoriteId(9),
            coordinate: None,
        };
        let err = view.load(args, now()).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<SkyError>(),
            Some(&SkyError::MissingCoordinate(FavoriteId(9)))
        );
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn reverse_geocoding_failure_uses_fallback_label() {
        let repo = Arc::new(FakeRepository::default());
        let geocoder = Arc::new(FakeGeocoder {
            fail_reverse: true,
            ..FakeGeocoder::default()
        });
        let (deps, _prefs) = collaborators(repo, geocoder, true);

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        view.load(args(), now()).await.unwrap();

        let FavoriteViewState::Displayed(display) = view.state() else {
            panic!("expected displayed state");
        };
        assert_eq!(display.location.name, UNKNOWN_PLACE);
        assert!(view.take_notices().is_empty());
    }

    #[tokio::test]
    async fn closed_view_discards_results() {
        let repo = Arc::new(FakeRepository::default());
        let (deps, _prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), true);

        let (scope, guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        guard.close();
        view.load(args(), now()).await.unwrap();

        assert_eq!(repo.calls().len(), 1);
        assert_eq!(view.state(), &FavoriteViewState::Loading);
    }

    #[tokio::test]
    async fn invalid_unit_preference_fails_before_fetching() {
        let repo = Arc::new(FakeRepository::default());
        let (deps, _prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), true);
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(PrefKey::UnitSystem, "cubits".into()).unwrap();
        let deps = Collaborators {
            preferences: Preferences::new(store),
            ..deps
        };

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        let err = view.load(args(), now()).await.unwrap_err();

        assert!(err.to_string().contains("cubits"));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn reload_replaces_previous_display() {
        let repo = Arc::new(FakeRepository::default());
        let (deps, prefs) = collaborators(repo.clone(), Arc::new(FakeGeocoder::default()), true);

        let (scope, _guard) = ViewScope::open();
        let mut view = FavoriteWeatherView::new(deps, scope);
        view.load(args(), now()).await.unwrap();

        prefs.set_language(Language::Ar).unwrap();
        view.load(args(), now()).await.unwrap();

        let FavoriteViewState::Displayed(display) = view.state() else {
            panic!("expected displayed state");
        };
        assert_eq!(display.units.language, Language::Ar);
        assert_eq!(display.readings.temperature, "٢٣ °م");
        assert_eq!(repo.calls().len(), 2);
    }
}
