use anyhow::Result;
use std::sync::Arc;

use skyscope_core::{
    Collaborators, Config, Preferences, Repository,
    connectivity::{Connectivity, FixedConnectivity, HttpConnectivity},
    geocode::NominatimGeocoder,
    preferences::FilePreferenceStore,
    provider::provider_from_config,
    repository::FavoriteStore,
};

/// Open the on-disk preference store.
pub fn preferences() -> Result<Preferences> {
    let store = FilePreferenceStore::open(Config::preferences_file_path()?)?;
    Ok(Preferences::new(Arc::new(store)))
}

/// Wire every collaborator from the saved configuration.
///
/// Without an API key the repository is store-only: local commands keep
/// working and online refreshes report the missing key.
pub fn collaborators(offline: bool) -> Result<Collaborators> {
    let config = Config::load()?;
    let store = FavoriteStore::open(Config::favorites_file_path()?)?;
    let repository = if config.is_configured() {
        Repository::new(provider_from_config(&config)?, store)
    } else {
        Repository::local(store)
    };

    let connectivity: Arc<dyn Connectivity> = if offline {
        Arc::new(FixedConnectivity(false))
    } else {
        Arc::new(HttpConnectivity::new(config.connectivity_probe_url())?)
    };

    Ok(Collaborators {
        repository: Arc::new(repository),
        preferences: preferences()?,
        connectivity,
        geocoder: Arc::new(NominatimGeocoder::new(config.geocoder_base_url())?),
    })
}
