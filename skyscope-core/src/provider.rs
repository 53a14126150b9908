use crate::{
    Config,
    error::SkyError,
    model::{Coordinate, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
    units::UnitPreference,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Remote source of weather snapshots.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        coord: Coordinate,
        units: UnitPreference,
    ) -> anyhow::Result<WeatherSnapshot>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or(SkyError::ProviderNotConfigured)?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), config.weather_base_url())?;
    Ok(Box::new(provider))
}
