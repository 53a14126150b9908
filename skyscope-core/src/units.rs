use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::SkyError;

/// Measurement system the weather provider reports values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    /// Kelvin and metres per second.
    Standard,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial, UnitSystem::Standard]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = SkyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            "standard" => Ok(UnitSystem::Standard),
            _ => Err(SkyError::UnknownUnitSystem(value.to_string())),
        }
    }
}

/// Display language; also selects the numeral script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::En, Language::Ar]
    }

    pub(crate) fn chrono_locale(&self) -> chrono::Locale {
        match self {
            Language::En => chrono::Locale::en_US,
            Language::Ar => chrono::Locale::ar_EG,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = SkyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            _ => Err(SkyError::UnknownLanguage(value.to_string())),
        }
    }
}

/// The resolved unit/language pair a reading is displayed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitPreference {
    pub unit_system: UnitSystem,
    pub language: Language,
}

impl UnitPreference {
    pub fn new(unit_system: UnitSystem, language: Language) -> Self {
        Self { unit_system, language }
    }
}

/// Suffixes appended to temperature and wind speed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStrings {
    pub temperature: &'static str,
    pub wind_speed: &'static str,
}

/// Fixed suffix table for every unit system and language.
pub fn resolve_unit_strings(unit_system: UnitSystem, language: Language) -> UnitStrings {
    let (temperature, wind_speed) = match (language, unit_system) {
        (Language::En, UnitSystem::Metric) => ("°C", " m/s"),
        (Language::En, UnitSystem::Imperial) => ("°F", " miles/h"),
        (Language::En, UnitSystem::Standard) => ("°K", " m/s"),
        (Language::Ar, UnitSystem::Metric) => (" °م", " م/ث"),
        (Language::Ar, UnitSystem::Imperial) => (" °ف", " ميل/س"),
        (Language::Ar, UnitSystem::Standard) => (" °ك", " م/ث"),
    };

    UnitStrings { temperature, wind_speed }
}
