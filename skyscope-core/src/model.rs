use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::SkyError, units::UnitPreference};

/// Opaque identifier of a saved favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(pub u32);

impl fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Rejects pairs outside the WGS84 range.
    pub fn validated(lat: f64, lon: f64) -> Result<Self, SkyError> {
        let coord = Self::new(lat, lon);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(SkyError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.4}, {:.4}", self.lat, self.lon))
    }
}

/// A coordinate with its best-effort reverse-geocoded name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCoordinate {
    pub coordinate: Coordinate,
    pub name: String,
}

/// Current conditions as returned by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub clouds_pct: u8,
    pub visibility_m: u32,
    pub uv_index: f64,
    pub wind_speed: f64,
    pub condition_code: String,
    pub description: String,
    pub coordinate: Coordinate,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub condition_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub time: DateTime<Utc>,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub condition_code: String,
    pub description: String,
}

/// Everything one fetch produced. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: WeatherReading,
    pub hourly: Vec<HourlyForecastEntry>,
    pub daily: Vec<DailyForecastEntry>,
    /// IANA zone name reported by the provider, e.g. "Africa/Cairo".
    pub timezone: String,
    /// Units and language the values were fetched in.
    pub units: UnitPreference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub id: FavoriteId,
    pub coordinate: Coordinate,
    pub units: UnitPreference,
    #[serde(default)]
    pub snapshot: Option<WeatherSnapshot>,
}
