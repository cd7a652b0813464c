//! # CLI Structure and Argument Parsing
//!
//! This module defines the command-line interface for `radmon`. The CLI is built
//! using `clap` with derive macros.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Narrative status and live readings
//! radmon status
//! radmon readings
//! radmon station Мозырь
//!
//! # Aggregates
//! radmon region gomel
//! radmon mean --format json
//!
//! # Offline reference queries
//! radmon nearest 52.12 23.80
//! radmon regions
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Main CLI structure for the `radmon` command
#[derive(Parser, Clone, Debug)]
#[command(name = "radmon")]
#[command(version)]
#[command(about = "radmon - Radiation-monitoring readings for Belarus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress warnings (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides autodiscovery). Also via `RADMON_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "RADMON_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `radmon` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show the current narrative radiation status
    Status,

    /// Show readings for every station, grouped by region
    Readings,

    /// Show the current reading at one station
    Station {
        /// Station name exactly as listed by `radmon regions`
        name: String,
    },

    /// Show the table and average for one region
    Region {
        /// Region slug (e.g. `gomel`) or full region name
        region: String,
    },

    /// Show the network-wide average
    Mean,

    /// Find the monitoring station closest to a coordinate
    #[command(allow_negative_numbers = true)]
    Nearest {
        /// Latitude in decimal degrees
        latitude: f64,
        /// Longitude in decimal degrees
        longitude: f64,
    },

    /// List regions and their stations
    Regions,
}
