// lib/src/config/config_constants.rs

pub const DEFAULT_CONFIG_FILE_NAME: &str = "sepsisguard.toml";
pub const DEFAULT_ALERT_MESSAGE: &str = "High-Risk Patient Alert!";
pub const DEFAULT_LOG_LEVEL: &str = "info";
