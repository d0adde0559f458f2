// lib/src/config/mod.rs

pub mod config_constants;
pub mod config_defaults;
pub mod config_helpers;
pub mod config_structs;

pub use config_constants::*;
pub use config_helpers::{load_guard_config, parse_guard_config};
pub use config_structs::{AlertConfig, GuardConfig, LoggingConfig, StorageConfig};
