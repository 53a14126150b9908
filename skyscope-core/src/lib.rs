//! Core library for the `skyscope` weather app.
//!
//! This crate defines:
//! - Shared domain models (readings, forecasts, favorites)
//! - Icon lookup and unit/locale formatting (English and Arabic)
//! - Preference storage, connectivity checks and geocoding
//! - The data-access layer over OpenWeather plus a local favorites cache
//! - The favorite weather view and location picker orchestrators
//!
//! It is used by `skyscope-cli`, but any front end that can render strings
//! and forward user input can drive the orchestrators.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod favorite_view;
pub mod format;
pub mod geocode;
pub mod icon;
pub mod model;
pub mod picker;
pub mod preferences;
pub mod provider;
pub mod repository;
pub mod units;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::SkyError;
pub use favorite_view::{FavoriteArgs, FavoriteViewState, FavoriteWeatherView};
pub use format::{DisplayStrings, format_reading, localize_numeral};
pub use icon::{IconId, resolve_icon};
pub use model::{Coordinate, FavoriteId, FavoriteLocation, WeatherReading, WeatherSnapshot};
pub use picker::{LocationPicker, PickerMode, PickerState};
pub use preferences::Preferences;
pub use provider::WeatherProvider;
pub use repository::{Repository, WeatherRepository};
pub use units::{Language, UnitPreference, UnitSystem, resolve_unit_strings};
pub use view::{Collaborators, Destination, Notice, ViewGuard, ViewScope};
