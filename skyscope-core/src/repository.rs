//! Data-access layer: favorites persistence plus remote refresh.

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    error::SkyError,
    model::{Coordinate, FavoriteId, FavoriteLocation, WeatherSnapshot},
    provider::WeatherProvider,
    units::{Language, UnitPreference, UnitSystem},
};

#[async_trait]
pub trait WeatherRepository: Send + Sync + Debug {
    /// Last snapshot stored for a favorite, without touching the network.
    async fn favorite_weather(&self, id: FavoriteId) -> Result<Option<WeatherSnapshot>>;

    /// Fetch fresh weather and store it under `id`.
    async fn refresh_weather(
        &self,
        coord: Coordinate,
        units: UnitPreference,
        id: FavoriteId,
    ) -> Result<WeatherSnapshot>;

    async fn create_favorite(
        &self,
        coord: Coordinate,
        language: Language,
        unit_system: UnitSystem,
    ) -> Result<FavoriteId>;

    async fn favorite(&self, id: FavoriteId) -> Result<Option<FavoriteLocation>>;

    async fn favorites(&self) -> Result<Vec<FavoriteLocation>>;

    /// Returns whether a favorite was removed.
    async fn delete_favorite(&self, id: FavoriteId) -> Result<bool>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct FavoritesFile {
    next_id: u32,
    favorites: Vec<FavoriteLocation>,
}

/// Favorites with their cached weather, optionally backed by a JSON file.
#[derive(Debug)]
pub struct FavoriteStore {
    path: Option<PathBuf>,
    data: Mutex<FavoritesFile>,
}

impl FavoriteStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(FavoritesFile::default()),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read favorites file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse favorites file: {}", path.display()))?
        } else {
            FavoritesFile::default()
        };

        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    fn save(&self, data: &FavoritesFile) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(data).context("Failed to serialize favorites")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write favorites file: {}", path.display()))
    }

    /// Apply `change` to a copy and keep it only once it is on disk.
    fn update<T>(&self, change: impl FnOnce(&mut FavoritesFile) -> Result<T>) -> Result<T> {
        let mut data = self.data.lock();
        let mut staged = data.clone();
        let out = change(&mut staged)?;
        self.save(&staged)?;
        *data = staged;
        Ok(out)
    }

    pub fn create(&self, coordinate: Coordinate, units: UnitPreference) -> Result<FavoriteId> {
        self.update(|data| {
            data.next_id += 1;
            let id = FavoriteId(data.next_id);
            data.favorites.push(FavoriteLocation {
                id,
                coordinate,
                units,
                snapshot: None,
            });
            Ok(id)
        })
    }

    pub fn get(&self, id: FavoriteId) -> Option<FavoriteLocation> {
        self.data
            .lock()
            .favorites
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    pub fn list(&self) -> Vec<FavoriteLocation> {
        self.data.lock().favorites.clone()
    }

    pub fn store_snapshot(&self, id: FavoriteId, snapshot: WeatherSnapshot) -> Result<()> {
        self.update(|data| {
            let favorite = data
                .favorites
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or(SkyError::UnknownFavorite(id))?;
            favorite.snapshot = Some(snapshot);
            Ok(())
        })
    }

    pub fn remove(&self, id: FavoriteId) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        self.update(|data| {
            data.favorites.retain(|f| f.id != id);
            Ok(true)
        })
    }
}

/// Default repository: remote provider + local favorites store.
#[derive(Debug)]
pub struct Repository {
    provider: Option<Box<dyn WeatherProvider>>,
    store: FavoriteStore,
}

impl Repository {
    pub fn new(provider: Box<dyn WeatherProvider>, store: FavoriteStore) -> Self {
        Self {
            provider: Some(provider),
            store,
        }
    }

    /// Store-only repository; remote refreshes fail until a provider is configured.
    pub fn local(store: FavoriteStore) -> Self {
        Self {
            provider: None,
            store,
        }
    }
}

#[async_trait]
impl WeatherRepository for Repository {
    async fn favorite_weather(&self, id: FavoriteId) -> Result<Option<WeatherSnapshot>> {
        Ok(self.store.get(id).and_then(|f| f.snapshot))
    }

    async fn refresh_weather(
        &self,
        coord: Coordinate,
        units: UnitPreference,
        id: FavoriteId,
    ) -> Result<WeatherSnapshot> {
        if self.store.get(id).is_none() {
            return Err(SkyError::UnknownFavorite(id).into());
        }
        let provider = self
            .provider
            .as_ref()
            .ok_or(SkyError::ProviderNotConfigured)?;

        let snapshot = provider.fetch(coord, units).await?;
        self.store.store_snapshot(id, snapshot.clone())?;
        Ok(snapshot)
    }

    async fn create_favorite(
        &self,
        coord: Coordinate,
        language: Language,
        unit_system: UnitSystem,
    ) -> Result<FavoriteId> {
        let coord = Coordinate::validated(coord.lat, coord.lon)?;
        let id = self.store.create(coord, UnitPreference::new(unit_system, language))?;
        info!(%id, %coord, "created favorite");
        Ok(id)
    }

    async fn favorite(&self, id: FavoriteId) -> Result<Option<FavoriteLocation>> {
        Ok(self.store.get(id))
    }

    async fn favorites(&self) -> Result<Vec<FavoriteLocation>> {
        Ok(self.store.list())
    }

    async fn delete_favorite(&self, id: FavoriteId) -> Result<bool> {
        let removed = self.store.remove(id)?;
        if removed {
            info!(%id, "deleted favorite");
        }
        Ok(removed)
    }
}
