//! Region command implementation

use anyhow::{Context, Result};
use radmon_core::{Error, Monitor, RegionId, region_summary};

use crate::output::{OutputFormat, print_json, print_region_text, print_unavailable};

/// Print one region's table and mean.
pub async fn execute(monitor: &Monitor, selector: &str, format: OutputFormat) -> Result<()> {
    let id: RegionId = selector.parse()?;
    let region = monitor
        .catalog()
        .region_by_id(id)
        .with_context(|| format!("Region '{id}' is not in the catalog"))?;

    let Some(reading) = monitor.readings().await else {
        return print_unavailable(format);
    };

    match region_summary(region, &reading) {
        Ok(summary) => match format {
            OutputFormat::Text => print_region_text(&summary),
            OutputFormat::Json => print_json(&summary)?,
        },
        Err(Error::EmptyAggregation { .. }) => match format {
            OutputFormat::Text => println!("No current readings for {}", region.name()),
            OutputFormat::Json => print_json(&serde_json::json!({
                "region": region.name(),
                "rows": [],
                "mean": null,
            }))?,
        },
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
