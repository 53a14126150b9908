use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

use crate::{
    error::SkyError,
    model::Coordinate,
    units::{Language, UnitPreference, UnitSystem},
};

/// Keys of the flat preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrefKey {
    Latitude,
    Longitude,
    LocationName,
    TimeZone,
    UnitSystem,
    Language,
}

impl PrefKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::Latitude => "lat",
            PrefKey::Longitude => "lon",
            PrefKey::LocationName => "location",
            PrefKey::TimeZone => "time_zone",
            PrefKey::UnitSystem => "units",
            PrefKey::Language => "language",
        }
    }
}

/// Persistent key-value storage for user preferences.
pub trait PreferenceStore: Send + Sync + Debug {
    fn get(&self, key: PrefKey) -> Option<String>;
    fn set(&self, key: PrefKey, value: String) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<BTreeMap<PrefKey, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: PrefKey) -> Option<String> {
        self.values.read().get(&key).cloned()
    }

    fn set(&self, key: PrefKey, value: String) -> Result<()> {
        self.values.write().insert(key, value);
        Ok(())
    }
}

/// TOML-backed store; every `set` is written through to disk.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store at `path`, starting empty if the file doesn't exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(values).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: PrefKey) -> Option<String> {
        self.values.read().get(key.as_str()).cloned()
    }

    fn set(&self, key: PrefKey, value: String) -> Result<()> {
        let mut values = self.values.write();
        let mut staged = values.clone();
        staged.insert(key.as_str().to_string(), value);
        self.save(&staged)?;
        *values = staged;
        Ok(())
    }
}

/// Typed accessor over a [`PreferenceStore`]; defaults are resolved on read.
#[derive(Debug, Clone)]
pub struct Preferences {
    store: Arc<dyn PreferenceStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPreferenceStore::new()))
    }

    pub fn unit_system(&self) -> Result<UnitSystem, SkyError> {
        match self.store.get(PrefKey::UnitSystem) {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Ok(UnitSystem::default()),
        }
    }

    pub fn language(&self) -> Result<Language, SkyError> {
        match self.store.get(PrefKey::Language) {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Ok(Language::default()),
        }
    }

    pub fn unit_preference(&self) -> Result<UnitPreference, SkyError> {
        Ok(UnitPreference::new(self.unit_system()?, self.language()?))
    }

    pub fn set_unit_system(&self, units: UnitSystem) -> Result<()> {
        self.store.set(PrefKey::UnitSystem, units.as_str().to_string())
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.store.set(PrefKey::Language, language.as_str().to_string())
    }

    pub fn latitude(&self) -> f64 {
        self.float(PrefKey::Latitude)
    }

    pub fn longitude(&self) -> f64 {
        self.float(PrefKey::Longitude)
    }

    pub fn location_name(&self) -> String {
        self.store.get(PrefKey::LocationName).unwrap_or_default()
    }

    pub fn time_zone(&self) -> String {
        self.store.get(PrefKey::TimeZone).unwrap_or_default()
    }

    /// Last one-time location, if one has been set.
    pub fn last_location(&self) -> Option<Coordinate> {
        (!self.is_location_unset()).then(|| Coordinate::new(self.latitude(), self.longitude()))
    }

    pub fn set_coordinate(&self, coord: Coordinate) -> Result<()> {
        self.store.set(PrefKey::Latitude, coord.lat.to_string())?;
        self.store.set(PrefKey::Longitude, coord.lon.to_string())
    }

    pub fn update_location(&self, coord: Coordinate, name: &str, time_zone: &str) -> Result<()> {
        self.set_coordinate(coord)?;
        self.store.set(PrefKey::LocationName, name.to_string())?;
        self.store.set(PrefKey::TimeZone, time_zone.to_string())
    }

    /// Both coordinates still at their 0.0 default.
    pub fn is_location_unset(&self) -> bool {
        self.latitude() == 0.0 && self.longitude() == 0.0
    }

    pub fn is_location_and_time_zone_unset(&self) -> bool {
        self.location_name().is_empty() && self.time_zone().is_empty()
    }

    fn float(&self, key: PrefKey) -> f64 {
        let Some(raw) = self.store.get(key) else {
            return 0.0;
        };
        raw.parse().unwrap_or_else(|_| {
            debug!(key = key.as_str(), value = %raw, "ignoring unparsable preference");
            0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_resolved_at_read_time() {
        let prefs = Preferences::in_memory();
        assert_eq!(prefs.unit_system(), Ok(UnitSystem::Metric));
        assert_eq!(prefs.language(), Ok(Language::En));
        assert_eq!(prefs.latitude(), 0.0);
        assert_eq!(prefs.longitude(), 0.0);
        assert!(prefs.is_location_unset());
        assert!(prefs.is_location_and_time_zone_unset());
        assert_eq!(prefs.last_location(), None);
    }

    #[test]
    fn bad_unit_system_is_rejected_on_read() {
        let store = Arc::new(MemoryPreferenceStore::new());
        store.set(PrefKey::UnitSystem, "furlongs".into()).unwrap();
        let prefs = Preferences::new(store);

        assert_eq!(prefs.unit_system(), Err(SkyError::UnknownUnitSystem("furlongs".into())));
        assert!(prefs.unit_preference().is_err());
    }

    #[test]
    fn update_location_sets_all_fields() {
        let prefs = Preferences::in_memory();
        prefs.update_location(Coordinate::new(30.0, 31.2), "Cairo, Egypt", "Africa/Cairo").unwrap();

        assert_eq!(prefs.last_location(), Some(Coordinate::new(30.0, 31.2)));
        assert_eq!(prefs.location_name(), "Cairo, Egypt");
        assert_eq!(prefs.time_zone(), "Africa/Cairo");
        assert!(!prefs.is_location_and_time_zone_unset());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        {
            let prefs = Preferences::new(Arc::new(FilePreferenceStore::open(&path).unwrap()));
            prefs.set_unit_system(UnitSystem::Imperial).unwrap();
            prefs.set_language(Language::Ar).unwrap();
            prefs.set_coordinate(Coordinate::new(10.0, 20.0)).unwrap();
        }

        let prefs = Preferences::new(Arc::new(FilePreferenceStore::open(&path).unwrap()));
        assert_eq!(
            prefs.unit_preference(),
            Ok(UnitPreference::new(UnitSystem::Imperial, Language::Ar))
        );
        assert_eq!(prefs.last_location(), Some(Coordinate::new(10.0, 20.0)));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let prefs = Preferences::new(Arc::new(
            FilePreferenceStore::open(blocker.join("preferences.toml")).unwrap(),
        ));

        assert!(prefs.set_unit_system(UnitSystem::Imperial).is_err());
        assert_eq!(prefs.unit_system(), Ok(UnitSystem::Metric));
    }
}
