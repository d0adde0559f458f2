// lib/src/config/config_structs.rs

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use models::errors::{GuardError, GuardResult};

use crate::config::config_defaults::*;

/// Represents the `[alerts]` section of the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertConfig {
    /// Headline shown on an alert notice.
    #[serde(default = "default_alert_message")]
    pub message: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        AlertConfig { message: default_alert_message() }
    }
}

/// Represents the `[storage]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Where trigger snapshots are kept between runs. Can be overridden by CLI.
    #[serde(default = "default_state_file")]
    pub state_file: Option<PathBuf>,
}

/// Represents the `[logging]` section of the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: default_log_level() }
    }
}

/// Represents the entire structure of `sepsisguard.toml`. Every section is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GuardConfig {
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GuardConfig {
    pub fn log_level_filter(&self) -> GuardResult<LevelFilter> {
        LevelFilter::from_str(&self.logging.level).map_err(|_| {
            GuardError::ConfigError(format!("unknown log level '{}'", self.logging.level))
        })
    }
}
