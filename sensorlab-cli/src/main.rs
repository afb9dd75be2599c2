//! ## sensorlab-cli
//! **Terminal front-end for the sensor simulations**
//!
//! - `kinds`: list sensor profiles
//! - `watch`: mount a live view and chart it in the terminal
//! - `simulate`: deterministic headless run or scenario replay

use clap::Parser;
use sensorlab_config::SensorlabConfig;
use sensorlab_telemetry::logging::EventLogger;

mod commands;
mod terminal;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SensorlabConfig::load_from_path(path)?,
        None => SensorlabConfig::load()?,
    };
    EventLogger::init(&config.telemetry.log_level);

    match cli.command {
        Commands::Kinds => commands::list_kinds(),
        Commands::Watch(args) => commands::run_watch(args, &config).await,
        Commands::Simulate(args) => commands::run_simulate(args, &config),
    }
}
