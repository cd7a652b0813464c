//! Grouped statistics over a reading snapshot.
//!
//! A region table lists the region's stations that are present in the snapshot,
//! in catalog declaration order, each with a fixed-width label for monospace
//! rendering. Averages over an empty set are reported as
//! [`Error::EmptyAggregation`] rather than producing `NaN`.

use crate::catalog::{Catalog, Region};
use crate::types::{Reading, RegionSummary, SummaryRow};
use crate::{Error, Result};

/// Column width of station labels in region tables.
pub const LABEL_WIDTH: usize = 20;

/// Filler used to extend short labels.
pub const LABEL_FILL: char = '.';

/// Fit `name` to exactly `width` characters: truncate long names, fill short ones
/// on the right with [`LABEL_FILL`]. Widths are counted in characters, not bytes.
///
/// ```rust
/// use radmon_core::aggregate::pad_label;
///
/// assert_eq!(pad_label("Пинск", 8), "Пинск...");
/// assert_eq!(pad_label("Березинский заповедник", 11), "Березинский");
/// ```
pub fn pad_label(name: &str, width: usize) -> String {
    let mut label: String = name.chars().take(width).collect();
    let len = label.chars().count();
    label.extend(std::iter::repeat_n(LABEL_FILL, width - len));
    label
}

/// Table and mean for one region.
///
/// Only exact station-name matches count as membership. Stations of the region
/// absent from the snapshot are omitted from the rows.
///
/// # Errors
///
/// Returns [`Error::EmptyAggregation`] if none of the region's stations is present.
pub fn region_summary(region: &Region, reading: &Reading) -> Result<RegionSummary> {
    let rows: Vec<SummaryRow> = region
        .stations()
        .iter()
        .filter_map(|station| {
            reading.get(station.name()).map(|value| SummaryRow {
                station: station.name().to_string(),
                label: pad_label(station.name(), LABEL_WIDTH),
                value,
            })
        })
        .collect();

    let mean = mean(rows.iter().map(|row| row.value)).ok_or_else(|| Error::EmptyAggregation {
        scope: region.name().to_string(),
    })?;

    Ok(RegionSummary {
        region: region.name().to_string(),
        rows,
        mean,
    })
}

/// Mean over every value in the snapshot.
///
/// # Errors
///
/// Returns [`Error::EmptyAggregation`] if the snapshot is empty.
pub fn network_mean(reading: &Reading) -> Result<f64> {
    mean(reading.values()).ok_or_else(|| Error::EmptyAggregation {
        scope: "network".to_string(),
    })
}

/// Summaries for every catalog region that has at least one value, in catalog order.
pub fn station_table(catalog: &Catalog, reading: &Reading) -> Vec<RegionSummary> {
    catalog
        .regions()
        .iter()
        .filter_map(|region| region_summary(region, reading).ok())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
