//! Daemon settings, read once from `$XDG_CONFIG_HOME/tilebind/config.json`
//! at startup. Changes take effect on restart.
//!
//!
//! ```json
//! {
//!   "keymap": "diagonal",
//!   "alert_duration_seconds": 0.75,
//!   "fire_command": "/usr/local/bin/tilebind-fire"
//! }
//! ```

use crate::binding::Keymap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Missing fields take their default, so `{}` is a complete file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which set of key chords to install.
    pub keymap: Keymap,
    /// How long feedback alerts stay on screen, in seconds.
    pub alert_duration_seconds: f64,
    /// Program the host runs when a bound chord fires.  It receives the
    /// chord's text form as its only argument.
    pub fire_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keymap: Keymap::Classic,
            alert_duration_seconds: 1.0,
            fire_command: "tilebind-fire".into(),
        }
    }
}

impl Config {
    /// Read, parse and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text).map_err(|ConfigError(msg)| ConfigError(format!("{}: {}", path.display(), msg)))
    }

    /// Parse and validate JSON text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alert_duration_seconds.is_finite() || self.alert_duration_seconds < 0.0 {
            return Err(ConfigError(format!(
                "alert_duration_seconds must be a non-negative number, got {}",
                self.alert_duration_seconds
            )));
        }
        if self.fire_command.trim().is_empty() {
            return Err(ConfigError("fire_command must not be empty".into()));
        }
        Ok(())
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_secs_f64(self.alert_duration_seconds.max(0.0))
    }
}

/// Why a config file was not usable.
#[derive(Debug, thiserror::Error)]
#[error("invalid config: {0}")]
pub struct ConfigError(String);
