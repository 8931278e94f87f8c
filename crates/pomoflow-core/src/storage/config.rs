//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Interval durations and rounds per long break
//! - Continuity mode (auto-advance policy)
//! - Theme name (presentational passthrough)
//! - Notification preferences
//! - Music service settings
//!
//! Configuration is stored at `~/.config/pomoflow/config.toml`. A file
//! that cannot be parsed is silently replaced by the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{Continuity, Sequence};

/// Interval duration configuration, all in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_activity_secs")]
    pub activity_secs: u64,
    #[serde(default = "default_short_break_secs")]
    pub short_break_secs: u64,
    #[serde(default = "default_long_break_secs")]
    pub long_break_secs: u64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
}

/// Music service configuration.
///
/// The connection handshake itself lives outside this crate; the service
/// name selects which external collaborator receives control commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicConfig {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default = "default_true")]
    pub autoplay_on_activity: bool,
    #[serde(default = "default_true")]
    pub pause_on_break: bool,
    /// Track to request when autoplay fires (service-specific id).
    #[serde(default)]
    pub track_id: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomoflow/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationsConfig,
    #[serde(default = "default_rounds")]
    pub rounds_per_long_break: u32,
    #[serde(default = "default_continuity")]
    pub continuity: Continuity,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub music: MusicConfig,
}

// Default functions
fn default_activity_secs() -> u64 {
    25 * 60
}
fn default_short_break_secs() -> u64 {
    5 * 60
}
fn default_long_break_secs() -> u64 {
    15 * 60
}
fn default_rounds() -> u32 {
    4
}
fn default_continuity() -> Continuity {
    Continuity::Partial
}
fn default_theme() -> String {
    "tomato".into()
}
fn default_true() -> bool {
    true
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            activity_secs: default_activity_secs(),
            short_break_secs: default_short_break_secs(),
            long_break_secs: default_long_break_secs(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            service: None,
            autoplay_on_activity: true,
            pause_on_break: true,
            track_id: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            durations: DurationsConfig::default(),
            rounds_per_long_break: default_rounds(),
            continuity: default_continuity(),
            theme: default_theme(),
            notifications: NotificationsConfig::default(),
            music: MusicConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;

                let invalid = |message: String| ConfigError::InvalidValue {
                    key: key.into(),
                    message,
                };
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        }

        Err(ConfigError::UnknownKey(key.into()))
    }

    fn path() -> Option<PathBuf> {
        data_dir().ok().map(|d| d.join("config.toml"))
    }

    /// Load from disk, falling back to the defaults on any failure.
    ///
    /// A missing or malformed file is not an error: the defaults are
    /// written back (best effort) and returned.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(cfg) => cfg,
                Err(_) => Self::default(),
            },
            Err(_) => {
                let cfg = Self::default();
                let _ = cfg.save();
                cfg
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().ok_or_else(|| ConfigError::SaveFailed {
            path: PathBuf::from("config.toml"),
            message: "data directory unavailable".into(),
        })?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.into(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }

    /// Build the interval sequence from the configured durations.
    pub fn sequence(&self) -> Sequence {
        Sequence::build(
            self.durations.activity_secs,
            self.durations.short_break_secs,
            self.durations.long_break_secs,
            self.rounds_per_long_break,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::IntervalKind;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("durations.activity_secs").as_deref(), Some("1500"));
        assert_eq!(cfg.get("continuity").as_deref(), Some("partial"));
        assert_eq!(cfg.get("theme").as_deref(), Some("tomato"));
        assert!(cfg.get("durations.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "durations.activity_secs", "3000").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "durations.activity_secs").unwrap(),
            &serde_json::Value::Number(3000.into())
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "music.pause_on_break", "false").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "music.pause_on_break").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "durations.nonexistent", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result =
            Config::set_json_value_by_path(&mut json, "notifications.enabled", "not_a_bool");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let parsed: Result<Config, _> = toml::from_str("this is [ not toml");
        assert!(parsed.is_err());
        // load() maps that failure to the defaults; spot-check the
        // fallback value here without touching the real config path.
        let cfg = Config::default();
        assert_eq!(cfg.durations.activity_secs, 1500);
        assert_eq!(cfg.rounds_per_long_break, 4);
    }

    #[test]
    fn sequence_from_config() {
        let cfg = Config::default();
        let seq = cfg.sequence();
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.get(0).unwrap().kind, IntervalKind::Activity);
        assert_eq!(seq.get(0).unwrap().duration_secs, 1500);
        assert_eq!(seq.intervals.last().unwrap().kind, IntervalKind::LongBreak);
    }

    #[test]
    fn partial_toml_uses_field_defaults() {
        let cfg: Config = toml::from_str("theme = \"midnight\"").unwrap();
        assert_eq!(cfg.theme, "midnight");
        assert_eq!(cfg.durations.activity_secs, 1500);
        assert_eq!(cfg.continuity, Continuity::Partial);
    }
}
