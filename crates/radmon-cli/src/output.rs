//! # Output Formatting
//!
//! Every command renders either human-readable text (default) or a single JSON
//! document on stdout. Logs go to stderr so JSON output stays parseable.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use radmon_core::RegionSummary;
use serde::Serialize;

/// Shown when a cycle produced no data (fetch or parse failure).
pub const UNAVAILABLE: &str = "Information is currently unavailable. Please try again later.";

/// Output format for CLI results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

impl OutputFormat {
    /// Check if this format is machine-readable.
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report that no data is available this cycle.
pub fn print_unavailable(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", UNAVAILABLE.yellow()),
        OutputFormat::Json => print_json(&serde_json::json!({
            "available": false,
            "message": UNAVAILABLE,
        }))?,
    }
    Ok(())
}

/// Render a region table with its labels column and mean.
pub fn print_region_text(summary: &RegionSummary) {
    println!("{}", summary.region.bold());
    for row in &summary.rows {
        println!("  {} {}", row.label, row.value);
    }
    println!("  {} {:.3}", "Average:".dimmed(), summary.mean);
}
