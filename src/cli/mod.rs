//! CLI surface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "Test orchestration and health aggregation for AI knowledge platforms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize vigil configuration and database
    Init(commands::init::InitArgs),

    /// Execute test suites and record results
    Run(commands::run::RunArgs),

    /// Aggregate health over a time window
    Health(commands::health::HealthArgs),

    /// Alert management commands
    #[command(subcommand)]
    Alerts(commands::alerts::AlertCommands),

    /// Baseline registry commands
    #[command(subcommand)]
    Baseline(commands::baseline::BaselineCommands),

    /// Scheduled job commands
    #[command(subcommand)]
    Schedule(commands::schedule::ScheduleCommands),

    /// Browse stored test results
    Results(commands::results::ResultsArgs),

    /// Purge aged results and resolved alerts
    Sweep(commands::sweep::SweepArgs),
}

/// Print a top-level error and exit non-zero. Only infrastructure
/// faults land here; failed checks are ordinary command output.
pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    if json_mode {
        eprintln!(
            "{}",
            serde_json::json!({ "error": format!("{err:#}") })
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
