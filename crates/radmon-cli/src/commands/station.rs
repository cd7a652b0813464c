//! Station command implementation

use anyhow::{Result, bail};
use colored::Colorize;
use radmon_core::Monitor;

use crate::output::{OutputFormat, print_json, print_unavailable};

/// Print the current reading at `name`.
pub async fn execute(monitor: &Monitor, name: &str, format: OutputFormat) -> Result<()> {
    let Some(station) = monitor.catalog().station(name) else {
        bail!("Unknown station '{name}'. Run 'radmon regions' to list stations.");
    };

    let Some(reading) = monitor.readings().await else {
        return print_unavailable(format);
    };

    let value = reading.get(station.name());
    match format {
        OutputFormat::Text => match value {
            Some(value) => println!("{} {value} µSv/h", station.name().bold()),
            None => println!("No current reading for {}", station.name()),
        },
        OutputFormat::Json => print_json(&serde_json::json!({
            "station": station.name(),
            "region": station.region(),
            "value": value,
        }))?,
    }
    Ok(())
}
