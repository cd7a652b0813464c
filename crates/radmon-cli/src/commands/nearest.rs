//! Nearest command implementation

use anyhow::Result;
use colored::Colorize;
use radmon_core::Monitor;

use crate::output::{OutputFormat, print_json};

/// Print the station closest to `(latitude, longitude)`.
pub fn execute(
    monitor: &Monitor,
    latitude: f64,
    longitude: f64,
    format: OutputFormat,
) -> Result<()> {
    let found = monitor.nearest(latitude, longitude)?;
    match format {
        OutputFormat::Text => println!(
            "{} {:.1} km",
            found.station.bold(),
            found.distance_m / 1000.0
        ),
        OutputFormat::Json => print_json(&found)?,
    }
    Ok(())
}
