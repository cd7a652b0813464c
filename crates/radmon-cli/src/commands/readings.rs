//! Readings command implementation

use anyhow::Result;
use radmon_core::{Monitor, station_table};

use crate::output::{OutputFormat, print_json, print_region_text, print_unavailable};

/// Print every region table for the current snapshot.
pub async fn execute(monitor: &Monitor, format: OutputFormat) -> Result<()> {
    let Some(reading) = monitor.readings().await else {
        return print_unavailable(format);
    };

    let table = station_table(monitor.catalog(), &reading);
    match format {
        OutputFormat::Text => {
            for summary in &table {
                print_region_text(summary);
                println!();
            }
            println!("Updated {}", reading.fetched_at().format("%Y-%m-%d %H:%M UTC"));
        },
        OutputFormat::Json => print_json(&serde_json::json!({
            "fetchedAt": reading.fetched_at(),
            "regions": table,
        }))?,
    }
    Ok(())
}
