// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::config::config_constants::*;

pub fn default_alert_message() -> String {
    DEFAULT_ALERT_MESSAGE.to_string()
}

pub fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn default_state_file() -> Option<PathBuf> {
    None
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE_NAME)
}
