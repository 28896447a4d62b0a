use anyhow::{Context, Result};
use directories::ProjectDirs;
use eyeguard_core::{OffPolicy, StepKind, SystemConstants};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "eyeguard.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
    pub timing: Timing,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub black: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub green: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub yellow: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub blue: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub magenta: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub working: String,
    pub notify: String,
    pub break_time: String,
    pub suspended: String,
    pub off: String,
    pub progress_filled: String,
    pub progress_empty: String,
    pub input_cursor: String,
    pub header_left: String,
    pub header_right: String,
}

/// Engine constants. Not part of the user settings window.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Timing {
    pub notify_1_lead_secs: u64,
    pub notify_2_lead_secs: u64,
    pub suspended_minutes: u64,
    pub off_policy: OffPolicy,
    /// Status and tray refresh every N ticks.
    pub status_refresh_ticks: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(9, 14, 19),
            foreground: Color::Rgb(197, 201, 199),
            black: Color::Rgb(13, 12, 12),
            red: Color::Rgb(228, 104, 118),
            green: Color::Rgb(138, 154, 123),
            yellow: Color::Rgb(196, 178, 138),
            blue: Color::Rgb(127, 180, 202),
            magenta: Color::Rgb(162, 146, 163),
            gray: Color::Rgb(164, 167, 164),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            working: "◉".to_string(),
            notify: "◔".to_string(),
            break_time: "☕".to_string(),
            suspended: "⏸".to_string(),
            off: "○".to_string(),
            progress_filled: "█".to_string(),
            progress_empty: "░".to_string(),
            input_cursor: "▊".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        let defaults = SystemConstants::default();
        Self {
            notify_1_lead_secs: defaults.notify_1_lead.as_secs(),
            notify_2_lead_secs: defaults.notify_2_lead.as_secs(),
            suspended_minutes: defaults.suspended_duration.as_secs() / 60,
            off_policy: defaults.off_policy,
            status_refresh_ticks: 1,
        }
    }
}

impl Icons {
    pub fn for_step(&self, kind: StepKind) -> &str {
        match kind {
            StepKind::Working => &self.working,
            StepKind::Notify1 | StepKind::Notify2 => &self.notify,
            StepKind::Break => &self.break_time,
            StepKind::Suspended => &self.suspended,
            StepKind::Off => &self.off,
        }
    }
}

impl Timing {
    pub fn constants(&self) -> SystemConstants {
        SystemConstants {
            notify_1_lead: Duration::from_secs(self.notify_1_lead_secs),
            notify_2_lead: Duration::from_secs(self.notify_2_lead_secs),
            suspended_duration: Duration::from_secs(self.suspended_minutes * 60),
            off_policy: self.off_policy,
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 || !s.is_ascii() {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "eyeguard", "EyeGuard")
}

/// Config file location, if the platform has a config directory.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timing.notify_1_lead_secs, 55);
        assert_eq!(config.timing.notify_2_lead_secs, 5);
        assert_eq!(config.timing.suspended_minutes, 60);
        assert_eq!(config.timing.off_policy, OffPolicy::Indefinite);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r##"
            log_level = "debug"

            [theme]
            red = "#ff0000"

            [timing]
            notify_1_lead_secs = 0
            off_policy = "resume_after_timeout"
            "##,
        )
        .unwrap();
        assert_eq!(config.theme.red, Color::Rgb(255, 0, 0));
        assert_eq!(config.theme.green, Theme::default().green);
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        let constants = config.timing.constants();
        assert_eq!(constants.notify_1_lead, Duration::ZERO);
        assert_eq!(constants.notify_2_lead, Duration::from_secs(5));
        assert_eq!(constants.off_policy, OffPolicy::ResumeAfterTimeout);
    }

    #[test]
    fn rejects_bad_hex_colour() {
        let parsed = toml::from_str::<Config>("[theme]\nblue = \"blue\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_non_ascii_hex_colour() {
        let parsed = toml::from_str::<Config>("[theme]\nblue = \"#ab€d\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn bad_colour_in_file_is_a_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[theme]\nred = \"#ab€d\"").unwrap();
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timing]\nsuspended_minutes = 30").unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(
            config.timing.constants().suspended_duration,
            Duration::from_secs(30 * 60)
        );
    }
}
