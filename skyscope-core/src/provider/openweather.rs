use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::{
    model::{Coordinate, DailyForecastEntry, HourlyForecastEntry, WeatherReading, WeatherSnapshot},
    units::UnitPreference,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/3.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One Call API client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create OpenWeather client")?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    dt: i64,
    temp: f64,
    feels_like: f64,
    pressure: u32,
    humidity: u8,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    clouds: u8,
    #[serde(default)]
    visibility: u32,
    wind_speed: f64,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDailyTemp,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwOneCall {
    lat: f64,
    lon: f64,
    timezone: String,
    current: OwCurrent,
    #[serde(default)]
    hourly: Vec<OwHourly>,
    #[serde(default)]
    daily: Vec<OwDaily>,
}

impl OwOneCall {
    fn into_snapshot(self, units: UnitPreference) -> WeatherSnapshot {
        let (condition_code, description) = first_condition(&self.current.weather);

        let current = WeatherReading {
            temperature: self.current.temp,
            feels_like: self.current.feels_like,
            humidity_pct: self.current.humidity,
            pressure_hpa: self.current.pressure,
            clouds_pct: self.current.clouds,
            visibility_m: self.current.visibility,
            uv_index: self.current.uvi,
            wind_speed: self.current.wind_speed,
            condition_code,
            description,
            coordinate: Coordinate::new(self.lat, self.lon),
            observed_at: unix_to_utc(self.current.dt).unwrap_or_else(Utc::now),
        };

        let hourly = self
            .hourly
            .into_iter()
            .filter_map(|h| {
                Some(HourlyForecastEntry {
                    time: unix_to_utc(h.dt)?,
                    temperature: h.temp,
                    condition_code: first_condition(&h.weather).0,
                })
            })
            .collect();

        let daily = self
            .daily
            .into_iter()
            .filter_map(|d| {
                let (condition_code, description) = first_condition(&d.weather);
                Some(DailyForecastEntry {
                    time: unix_to_utc(d.dt)?,
                    min_temperature: d.temp.min,
                    max_temperature: d.temp.max,
                    condition_code,
                    description,
                })
            })
            .collect();

        WeatherSnapshot {
            current,
            hourly,
            daily,
            timezone: self.timezone,
            units,
        }
    }
}

fn first_condition(weather: &[OwCondition]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.icon.clone(), w.description.clone()))
        .unwrap_or_else(|| (String::new(), "Unknown".to_string()))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, coord: Coordinate, units: UnitPreference) -> Result<WeatherSnapshot> {
        let url = format!("{}/onecall", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coord.lat.to_string().as_str()),
                ("lon", coord.lon.to_string().as_str()),
                ("units", units.unit_system.as_str()),
                ("lang", units.language.as_str()),
                ("exclude", "minutely"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (one call)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwOneCall =
            serde_json::from_str(&body).context("Failed to parse OpenWeather one call JSON")?;

        info!(%coord, units = %units.unit_system, lang = %units.language, "fetched weather");

        Ok(parsed.into_snapshot(units))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
