//! TOML-based application settings.
//!
//! Stores user preferences:
//! - Display name shown in greetings
//! - Default round count and workout variant
//! - Lead-in and warning window lengths
//! - Cue and keep-awake switches
//!
//! Settings are stored at `<data dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::{Variant, WorkoutConfig, DEFAULT_PREP_SECONDS, DEFAULT_WARNING_SECONDS};

/// Cue output switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on each cue.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_rounds")]
    pub default_rounds: u32,
    #[serde(default)]
    pub default_variant: Variant,
    #[serde(default = "default_prep_seconds")]
    pub prep_seconds: u32,
    #[serde(default = "default_warning_seconds")]
    pub warning_seconds: u32,
    #[serde(default = "default_true")]
    pub keep_awake: bool,
    #[serde(default)]
    pub cues: CuesConfig,
}

fn default_user_name() -> String {
    "Athlete".into()
}
fn default_rounds() -> u32 {
    20
}
fn default_prep_seconds() -> u32 {
    DEFAULT_PREP_SECONDS
}
fn default_warning_seconds() -> u32 {
    DEFAULT_WARNING_SECONDS
}
fn default_true() -> bool {
    true
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: default_user_name(),
            default_rounds: default_rounds(),
            default_variant: Variant::default(),
            prep_seconds: default_prep_seconds(),
            warning_seconds: default_warning_seconds(),
            keep_awake: true,
            cues: CuesConfig::default(),
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
                ),
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot assign a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default settings");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Change a value in memory. The result must still validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed or leaves the settings invalid. `self` is unchanged then.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let value = if key == "default_variant" {
            value.parse::<Variant>()?.as_str().to_string()
        } else {
            value.to_string()
        };
        Self::set_json_value_by_path(&mut json, key, &value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// [`Config::apply`], then save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that these settings can build a workout.
    pub fn validate(&self) -> Result<()> {
        self.workout_config(None, None).map(|_| ())
    }

    /// Build a workout from the defaults, with optional per-run overrides.
    pub fn workout_config(
        &self,
        variant: Option<Variant>,
        rounds: Option<u32>,
    ) -> Result<WorkoutConfig> {
        WorkoutConfig::with_timing(
            variant.unwrap_or(self.default_variant),
            rounds.unwrap_or(self.default_rounds),
            self.prep_seconds,
            self.warning_seconds,
        )
        .map_err(CoreError::from)
    }
}
