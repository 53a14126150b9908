use thiserror::Error;

use crate::model::FavoriteId;

/// Domain errors raised by the formatting and orchestration layer.
///
/// Collaborator failures (network, storage) travel as `anyhow::Error`
/// instead; this enum only covers conditions the core itself detects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkyError {
    #[error("Unknown unit system '{0}'. Supported unit systems: metric, imperial, standard.")]
    UnknownUnitSystem(String),

    #[error("Unknown language '{0}'. Supported languages: en, ar.")]
    UnknownLanguage(String),

    #[error("Invalid coordinate ({lat}, {lon}): latitude must be within -90..90 and longitude within -180..180")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Refreshing favorite {0} online requires its coordinates")]
    MissingCoordinate(FavoriteId),

    #[error("No location has been chosen yet")]
    NoLocationChosen,

    #[error("No favorite with id {0}")]
    UnknownFavorite(FavoriteId),

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `skyscope configure` and enter your API key."
    )]
    ProviderNotConfigured,
}
