//! User-editable settings and the store that persists them.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Accepted range for both the work and the break duration, in minutes.
pub const DURATION_MINUTES_RANGE: RangeInclusive<u32> = 1..=100;

/// An on/off flag as it appears in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Switch {
    #[default]
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }

    pub fn toggled(self) -> Switch {
        match self {
            Switch::On => Switch::Off,
            Switch::Off => Switch::On,
        }
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on {
            Switch::On
        } else {
            Switch::Off
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    #[serde(rename = "work_duration")]
    pub work_duration_minutes: u32,
    #[serde(rename = "break_duration")]
    pub break_duration_minutes: u32,
    pub sounds: Switch,
    pub notifications: Switch,
    pub protection_status: Switch,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            work_duration_minutes: 45,
            break_duration_minutes: 15,
            sounds: Switch::On,
            notifications: Switch::On,
            protection_status: Switch::On,
        }
    }
}

impl UserSettings {
    pub fn work_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.work_duration_minutes) * 60)
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.break_duration_minutes) * 60)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.is_on()
    }

    pub fn sounds_enabled(&self) -> bool {
        self.sounds.is_on()
    }

    pub fn protection_on(&self) -> bool {
        self.protection_status.is_on()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("work_duration", self.work_duration_minutes)?;
        check_range("break_duration", self.break_duration_minutes)
    }
}

fn check_range(field: &'static str, value: u32) -> Result<(), SettingsError> {
    if DURATION_MINUTES_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: *DURATION_MINUTES_RANGE.start(),
            max: *DURATION_MINUTES_RANGE.end(),
        })
    }
}

/// Where settings come from and go to.
///
/// `read` never fails: implementations fall back to defaults for anything
/// missing or invalid, so the engine only ever sees validated values.
pub trait SettingsStore: Send {
    fn read(&self) -> UserSettings;

    fn apply_and_persist(&mut self, settings: &UserSettings) -> Result<(), SettingsError>;
}

/// Settings kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemorySettingsStore {
    settings: UserSettings,
}

impl MemorySettingsStore {
    pub fn new(settings: UserSettings) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self) -> UserSettings {
        self.settings
    }

    fn apply_and_persist(&mut self, settings: &UserSettings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = *settings;
        Ok(())
    }
}
