//! Status command implementation

use anyhow::Result;
use radmon_core::Monitor;

use crate::output::{OutputFormat, print_json, print_unavailable};

/// Print the narrative status paragraph.
pub async fn execute(monitor: &Monitor, format: OutputFormat) -> Result<()> {
    let Some(narrative) = monitor.narrative().await else {
        return print_unavailable(format);
    };

    match format {
        OutputFormat::Text => println!("{narrative}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "narrative": narrative }))?,
    }
    Ok(())
}
