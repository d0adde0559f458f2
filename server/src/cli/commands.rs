// server/src/cli/commands.rs

// This file defines the command-line arguments and subcommands
// for the SepsisGuard CLI using the `clap` crate.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sepsisguard-cli")]
#[command(version = "0.1.0")]
#[command(about = "Sepsis risk classification and high-risk alerting")]
pub struct CliArgs {
    /// Path to sepsisguard.toml
    #[arg(long, global = true, env = "SEPSISGUARD_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Commands {
    /// Classify one or more risk scores
    Classify {
        #[arg(value_name = "SCORE", required = true, allow_negative_numbers = true)]
        scores: Vec<f64>,
    },
    /// List the demo cohort with risk tiers
    Roster {
        /// Case-insensitive match on patient name or id
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Only show High tier patients
        #[arg(long)]
        high_risk: bool,
    },
    /// Show one patient's risk, vitals and admission details
    Patient {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Tier distribution and average score of the demo cohort
    Summary,
    /// Feed a recorded sequence of observations through the alert trigger
    Replay {
        #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
        /// Load trigger state from, and save it back to, this file
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        state_file: Option<PathBuf>,
    },
    /// Show unacknowledged alerts from saved trigger state
    Alerts {
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        state_file: Option<PathBuf>,
    },
}
