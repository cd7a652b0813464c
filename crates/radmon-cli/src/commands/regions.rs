//! Regions command implementation

use anyhow::Result;
use colored::Colorize;
use radmon_core::{Catalog, RegionId};
use serde::Serialize;

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct RegionInfo<'a> {
    slug: &'static str,
    name: &'a str,
    stations: Vec<&'a str>,
}

/// List regions with their slugs and stations.
pub fn execute(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let regions: Vec<RegionInfo<'_>> = RegionId::ALL
        .iter()
        .filter_map(|&id| {
            catalog.region_by_id(id).map(|region| RegionInfo {
                slug: id.slug(),
                name: region.name(),
                stations: region.stations().iter().map(|s| s.name()).collect(),
            })
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for info in &regions {
                println!("{} ({})", info.name.bold(), info.slug.cyan());
                println!("  {}", info.stations.join(", "));
            }
        },
        OutputFormat::Json => print_json(&regions)?,
    }
    Ok(())
}
