//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Calendar layout (visible hours, row height, days per page)
//! - Analysis/chat backend location and timeout
//! - Assistant greeting
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{data_dir, json_path};
use crate::calendar::{TimeGrid, MAX_WINDOW_DAYS};
use crate::error::ConfigError;

/// Calendar view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_hour_height")]
    pub hour_height: u32,
    /// Days shown per page.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

/// Analysis/chat backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Photo analysis runs several model calls and page fetches server-side,
    /// so this is generous.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Assistant configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

// Default functions
fn default_start_hour() -> u32 {
    7
}
fn default_end_hour() -> u32 {
    22
}
fn default_hour_height() -> u32 {
    60
}
fn default_window_days() -> u32 {
    2
}
fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_greeting() -> String {
    "Hi! Send me a photo of the injury or condition and I'll take a look.".into()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            hour_height: default_hour_height(),
            window_days: default_window_days(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                tracing::debug!(path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json_path::get_string(&json, key)
    }

    /// Set a config value by dot-separated key and validate the result.
    ///
    /// Leaves `self` untouched on error. Does not write to disk.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        json_path::set(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_grid()?;
        if !(1..=MAX_WINDOW_DAYS).contains(&self.calendar.window_days) {
            return Err(ConfigError::InvalidValue {
                key: "calendar.window_days".into(),
                message: format!("{} is outside 1..={MAX_WINDOW_DAYS}", self.calendar.window_days),
            });
        }
        url::Url::parse(&self.backend.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "backend.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Time grid described by the calendar section.
    pub fn time_grid(&self) -> Result<TimeGrid, ConfigError> {
        let c = &self.calendar;
        TimeGrid::new(c.start_hour, c.end_hour, c.hour_height).map_err(|e| {
            ConfigError::InvalidValue {
                key: "calendar".into(),
                message: e.to_string(),
            }
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn default_values_match_day_view() {
        let cfg = Config::default();
        assert_eq!(cfg.calendar.start_hour, 7);
        assert_eq!(cfg.calendar.end_hour, 22);
        assert_eq!(cfg.calendar.hour_height, 60);
        assert_eq!(cfg.calendar.window_days, 2);
        assert_eq!(cfg.backend.timeout(), Duration::from_secs(120));
        assert_eq!(cfg.time_grid().unwrap(), TimeGrid::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("[calendar]\nwindow_days = 7\n").unwrap();
        assert_eq!(cfg.calendar.window_days, 7);
        assert_eq!(cfg.calendar.start_hour, 7);
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.start_hour").as_deref(), Some("7"));
        assert_eq!(cfg.get("backend.base_url").as_deref(), Some("http://localhost:8000"));
        assert!(cfg.get("calendar.missing_key").is_none());
    }

    #[test]
    fn set_updates_and_validates() {
        let mut cfg = Config::default();
        cfg.set("calendar.window_days", "5").unwrap();
        assert_eq!(cfg.calendar.window_days, 5);

        let err = cfg.set("calendar.start_hour", "23").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.calendar.start_hour, 7);

        assert!(matches!(
            cfg.set("calendar.colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(cfg.set("backend.base_url", "not a url").is_err());
        assert!(cfg.set("calendar.window_days", "0").is_err());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg, Config::default());

        let mut changed = cfg.clone();
        changed.set("assistant.greeting", "Hello").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().assistant.greeting, "Hello");
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "calendar = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
