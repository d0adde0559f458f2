// server/src/cli/cli.rs

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use sepsisguard::config::load_guard_config;
use sepsisguard::GuardConfig;

use crate::cli::commands::{CliArgs, Commands};
use crate::cli::handlers::{
    handle_alerts, handle_classify, handle_patient, handle_replay, handle_roster, handle_summary,
    resolve_state_file,
};

/// The config's level is the default; `RUST_LOG` overrides it.
fn init_logging(config: &GuardConfig) -> Result<()> {
    let level = config.log_level_filter()?;
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .context("Failed to initialise logging")
}

pub fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let config = load_guard_config(args.config.clone()).context("Failed to load configuration")?;
    init_logging(&config)?;
    debug!("Running {:?}", args.command);

    match args.command {
        Commands::Classify { scores } => handle_classify(&scores, args.json),
        Commands::Roster { search, high_risk } => handle_roster(search.as_deref(), high_risk, args.json),
        Commands::Patient { id } => handle_patient(&id, args.json),
        Commands::Summary => handle_summary(args.json),
        Commands::Replay { file, state_file } => {
            let state_file = resolve_state_file(state_file, &config);
            handle_replay(&file, state_file.as_deref(), &config, args.json)
        }
        Commands::Alerts { state_file } => {
            let state_file = resolve_state_file(state_file, &config);
            handle_alerts(state_file.as_deref(), &config, args.json)
        }
    }
}
