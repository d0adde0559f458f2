// server/src/main.rs

// Entry point for the SepsisGuard CLI. Argument parsing, logging setup and
// dispatch all live in the cli module.

use anyhow::Result;
use sepsisguard_server::cli::start_cli;

fn main() -> Result<()> {
    start_cli()
}
