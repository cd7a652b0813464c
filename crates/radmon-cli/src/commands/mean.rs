//! Mean command implementation

use anyhow::Result;
use radmon_core::{Error, Monitor, network_mean};

use crate::output::{OutputFormat, print_json, print_unavailable};

/// Print the network-wide mean.
pub async fn execute(monitor: &Monitor, format: OutputFormat) -> Result<()> {
    let Some(reading) = monitor.readings().await else {
        return print_unavailable(format);
    };

    match network_mean(&reading) {
        Ok(mean) => match format {
            OutputFormat::Text => println!(
                "Network average: {mean:.4} µSv/h over {} stations",
                reading.len()
            ),
            OutputFormat::Json => print_json(&serde_json::json!({
                "mean": mean,
                "stations": reading.len(),
            }))?,
        },
        Err(Error::EmptyAggregation { .. }) => match format {
            OutputFormat::Text => println!("No current readings for the network"),
            OutputFormat::Json => print_json(&serde_json::json!({
                "mean": null,
                "stations": 0,
            }))?,
        },
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
