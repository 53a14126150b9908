//! Hand-written fakes for the view orchestrator tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    connectivity::FixedConnectivity,
    geocode::{GeocodedPlace, Geocoder},
    model::{
        Coordinate, DailyForecastEntry, FavoriteId, FavoriteLocation, HourlyForecastEntry,
        WeatherReading, WeatherSnapshot,
    },
    preferences::Preferences,
    repository::WeatherRepository,
    units::{Language, UnitPreference, UnitSystem},
    view::Collaborators,
};

pub fn snapshot(units: UnitPreference) -> WeatherSnapshot {
    WeatherSnapshot {
        current: WeatherReading {
            temperature: 23.7,
            feels_like: 24.1,
            humidity_pct: 40,
            pressure_hpa: 1012,
            clouds_pct: 75,
            visibility_m: 10000,
            uv_index: 6.4,
            wind_speed: 3.6,
            condition_code: "01d".into(),
            description: "clear sky".into(),
            coordinate: Coordinate::new(10.0, 20.0),
            observed_at: Utc.with_ymd_and_hms(2023, 4, 10, 12, 0, 0).unwrap(),
        },
        hourly: vec![HourlyForecastEntry {
            time: Utc.with_ymd_and_hms(2023, 4, 10, 13, 0, 0).unwrap(),
            temperature: 24.2,
            condition_code: "02d".into(),
        }],
        daily: vec![DailyForecastEntry {
            time: Utc.with_ymd_and_hms(2023, 4, 11, 10, 0, 0).unwrap(),
            min_temperature: 15.0,
            max_temperature: 27.0,
            condition_code: "10d".into(),
            description: "moderate rain".into(),
        }],
        timezone: "UTC".into(),
        units,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Cached(FavoriteId),
    Refresh(Coordinate, UnitPreference, FavoriteId),
    Create(Coordinate, Language, UnitSystem),
}

#[derive(Debug, Default)]
pub struct FakeRepository {
    pub calls: Mutex<Vec<RepoCall>>,
    pub cached: Mutex<Option<WeatherSnapshot>>,
    pub fail_create: Option<String>,
}

impl FakeRepository {
    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl WeatherRepository for FakeRepository {
    async fn favorite_weather(&self, id: FavoriteId) -> Result<Option<WeatherSnapshot>> {
        self.calls.lock().push(RepoCall::Cached(id));
        Ok(self.cached.lock().clone())
    }

    async fn refresh_weather(
        &self,
        coord: Coordinate,
        units: UnitPreference,
        id: FavoriteId,
    ) -> Result<WeatherSnapshot> {
        self.calls.lock().push(RepoCall::Refresh(coord, units, id));
        Ok(snapshot(units))
    }

    async fn create_favorite(
        &self,
        coord: Coordinate,
        language: Language,
        unit_system: UnitSystem,
    ) -> Result<FavoriteId> {
        self.calls.lock().push(RepoCall::Create(coord, language, unit_system));
        match &self.fail_create {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(FavoriteId(1)),
        }
    }

    async fn favorite(&self, _id: FavoriteId) -> Result<Option<FavoriteLocation>> {
        Ok(None)
    }

    async fn favorites(&self) -> Result<Vec<FavoriteLocation>> {
        Ok(vec![])
    }

    async fn delete_favorite(&self, _id: FavoriteId) -> Result<bool> {
        Ok(false)
    }
}

/// Answers forward queries from a fixed table; reverse lookups optionally fail.
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    pub places: Vec<GeocodedPlace>,
    pub place_name: Option<String>,
    pub fail_reverse: bool,
    /// Queries answered with no results regardless of the table.
    pub unresolvable: Vec<String>,
    pub forward_calls: Mutex<Vec<(String, usize)>>,
}

impl FakeGeocoder {
    pub fn with_places(places: &[(&str, f64, f64)]) -> Self {
        Self {
            places: places
                .iter()
                .map(|(line, lat, lon)| GeocodedPlace {
                    coordinate: Coordinate::new(*lat, *lon),
                    address_line: line.to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse_geocode(
        &self,
        _coord: Coordinate,
        _language: Language,
    ) -> Result<Option<String>> {
        if self.fail_reverse {
            return Err(anyhow!("geocoder unavailable"));
        }
        Ok(self.place_name.clone())
    }

    async fn forward_geocode(
        &self,
        query: &str,
        _language: Language,
        max_results: usize,
    ) -> Result<Vec<GeocodedPlace>> {
        self.forward_calls.lock().push((query.to_string(), max_results));
        if self.unresolvable.iter().any(|q| q == query) {
            return Ok(vec![]);
        }
        Ok(self
            .places
            .iter()
            .filter(|p| p.address_line.to_lowercase().contains(&query.to_lowercase()))
            .take(max_results)
            .cloned()
            .collect())
    }
}

pub fn collaborators(
    repository: Arc<FakeRepository>,
    geocoder: Arc<FakeGeocoder>,
    online: bool,
) -> (Collaborators, Preferences) {
    let preferences = Preferences::in_memory();
    let deps = Collaborators {
        repository,
        preferences: preferences.clone(),
        connectivity: Arc::new(FixedConnectivity(online)),
        geocoder,
    };
    (deps, preferences)
}
