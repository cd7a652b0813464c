//! radmon CLI - radiation-monitoring readings from the command line
//!
//! This is the main entry point for the radmon command-line interface.
//! Command implementations live in separate modules.

use anyhow::{Context, Result};
use clap::Parser;
use radmon_core::{Config, Monitor};

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::initialize_logging(&cli)?;

    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    let format = cli.format;

    let config =
        Config::load_with(cli.config.as_deref()).context("Failed to load configuration")?;
    let monitor = Monitor::new(&config)?;

    match cli.command {
        Commands::Status => commands::show_status(&monitor, format).await?,
        Commands::Readings => commands::show_readings(&monitor, format).await?,
        Commands::Station { name } => commands::show_station(&monitor, &name, format).await?,
        Commands::Region { region } => commands::show_region(&monitor, &region, format).await?,
        Commands::Mean => commands::show_mean(&monitor, format).await?,
        Commands::Nearest {
            latitude,
            longitude,
        } => commands::find_nearest(&monitor, latitude, longitude, format)?,
        Commands::Regions => commands::list_regions(monitor.catalog(), format)?,
    }

    Ok(())
}
