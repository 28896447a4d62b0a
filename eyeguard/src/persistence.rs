use anyhow::Result;
use eyeguard_core::{SettingsError, SettingsStore, UserSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SETTINGS_FILE: &str = "settings.json";

/// User settings kept as pretty-printed JSON.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory.
    pub fn open_default() -> Result<Self> {
        let proj_dirs = crate::config::project_dirs()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(Self::new(config_dir.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<UserSettings, SettingsError> {
        let json = fs::read_to_string(&self.path)?;
        let settings: UserSettings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }
}

impl SettingsStore for JsonSettingsStore {
    fn read(&self) -> UserSettings {
        if !self.path.exists() {
            info!(path = ?self.path, "no settings file, using defaults");
            return UserSettings::default();
        }
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = ?self.path, "invalid settings file, using defaults: {}", e);
                UserSettings::default()
            }
        }
    }

    fn apply_and_persist(&mut self, settings: &UserSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        info!(path = ?self.path, "settings saved");
        Ok(())
    }
}
