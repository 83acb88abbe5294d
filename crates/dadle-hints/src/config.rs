//! Hint engine configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid:
//!
//! ```toml
//! fetch_timeout_secs = 15
//! health_check_days = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use std::path::Path;
use std::time::Duration;

use dadle_core::TracingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Hint engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    /// Upper bound for a single provider fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// How far ahead a calendar health check looks, in days.
    pub health_check_days: u32,

    /// Subscriber settings for hosts that let the engine install one.
    pub logging: TracingConfig,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 15,
            health_check_days: 30,
            logging: TracingConfig::default(),
        }
    }
}

impl HintConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::invalid("fetch_timeout_secs must be at least 1"));
        }
        if self.health_check_days == 0 {
            return Err(ConfigError::invalid("health_check_days must be at least 1"));
        }
        if self.logging.parsed_level().is_err() {
            return Err(ConfigError::invalid(format!(
                "unknown logging.level `{}`",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Builder: set the per-provider fetch timeout in seconds.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Builder: set the health check horizon in days.
    pub fn with_health_check_days(mut self, days: u32) -> Self {
        self.health_check_days = days;
        self
    }

    /// Returns the per-provider fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Returns the health check horizon.
    pub fn health_check_horizon(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.health_check_days))
    }
}
