use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{geocode::DEFAULT_NOMINATIM_URL, provider::openweather::DEFAULT_BASE_URL};

pub const DEFAULT_PROBE_URL: &str = "https://clients3.google.com/generate_204";

/// OpenWeather credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Optional endpoint overrides, mostly useful for self-hosted geocoders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub weather_base_url: Option<String>,
    pub geocoder_base_url: Option<String>,
    pub connectivity_probe_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
///
/// [endpoints]
/// geocoder_base_url = "http://localhost:8080"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub openweather: Option<ProviderConfig>,

    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skyscope", "skyscope")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn preferences_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("preferences.toml"))
    }

    /// Favorites and their cached weather.
    pub fn favorites_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("favorites.json"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather = Some(ProviderConfig { api_key });
    }

    pub fn api_key(&self) -> Option<&str> {
        self.openweather.as_ref().map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some_and(|key| !key.is_empty())
    }

    pub fn weather_base_url(&self) -> &str {
        self.endpoints.weather_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn geocoder_base_url(&self) -> &str {
        self.endpoints.geocoder_base_url.as_deref().unwrap_or(DEFAULT_NOMINATIM_URL)
    }

    pub fn connectivity_probe_url(&self) -> &str {
        self.endpoints.connectivity_probe_url.as_deref().unwrap_or(DEFAULT_PROBE_URL)
    }
}
