// lib/src/config/config_helpers.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use models::errors::{GuardError, GuardResult};

use crate::config::config_defaults::default_config_path;
use crate::config::config_structs::GuardConfig;

pub fn parse_guard_config(content: &str) -> GuardResult<GuardConfig> {
    let config: GuardConfig = toml::from_str(content)
        .map_err(|e| GuardError::ConfigError(format!("Failed to parse config: {}", e)))?;
    // Reject a bad level at load time rather than when logging starts.
    config.log_level_filter()?;
    Ok(config)
}

fn read_guard_config(path: &Path) -> GuardResult<GuardConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        GuardError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    debug!("Loaded configuration from {}", path.display());
    parse_guard_config(&content)
}

/// Loads the configuration.
///
/// An explicit path must exist. Without one, `sepsisguard.toml` in the
/// working directory is used when present, and built-in defaults otherwise.
pub fn load_guard_config(config_file_path: Option<PathBuf>) -> GuardResult<GuardConfig> {
    match config_file_path {
        Some(path) => read_guard_config(&path),
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                read_guard_config(&default_path)
            } else {
                Ok(GuardConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_constants::DEFAULT_ALERT_MESSAGE;
    use log::LevelFilter;
    use std::path::PathBuf;

    #[test]
    fn should_fill_missing_sections_with_defaults() {
        let config = parse_guard_config("").unwrap();
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.alerts.message, DEFAULT_ALERT_MESSAGE);
        assert_eq!(config.storage.state_file, None);
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn should_parse_full_config() {
        let config = parse_guard_config(
            r#"
[alerts]
message = "Sepsis risk escalation"

[storage]
state_file = "/tmp/sepsisguard/state.msgpack"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.alerts.message, "Sepsis risk escalation");
        assert_eq!(
            config.storage.state_file,
            Some(PathBuf::from("/tmp/sepsisguard/state.msgpack"))
        );
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn should_reject_unknown_log_level() {
        let err = parse_guard_config("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, GuardError::ConfigError(_)));
    }

    #[test]
    fn should_fail_on_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_guard_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, GuardError::ConfigError(_)));
    }

    #[test]
    fn should_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sepsisguard.toml");
        fs::write(&path, "[alerts]\nmessage = \"Check patient\"\n").unwrap();
        let config = load_guard_config(Some(path)).unwrap();
        assert_eq!(config.alerts.message, "Check patient");
        assert_eq!(config.logging.level, "info");
    }
}
