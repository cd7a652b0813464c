//! # radmon-core
//!
//! Core functionality for radmon: a refresh-and-query pipeline over the national
//! radiation-monitoring network's published documents.
//!
//! The crate fetches two remote documents (a structured station feed and a narrative
//! status page), parses them into typed values, and answers queries over them: the
//! narrative status, the reading at one station, per-region tables with averages, and
//! the monitoring station nearest to a coordinate.
//!
//! ## Architecture
//!
//! - **Cache**: [`TimedCache`] memoizes fetch-and-parse results behind one expiry
//!   watermark per cache
//! - **Fetching**: [`Fetcher`] performs one bounded HTTP request per call
//! - **Parsing**: [`parser`] turns feed XML into station readings and extracts the
//!   status paragraph from the narrative page
//! - **Reference data**: [`Catalog`] holds the stations and the regions grouping them
//! - **Queries**: [`aggregate`] computes region tables and means; [`nearest()`] resolves
//!   the closest station on the WGS84 ellipsoid
//! - **Orchestration**: [`Monitor`] ties the above together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use radmon_core::{Config, Monitor, aggregate};
//!
//! # async fn example() -> radmon_core::Result<()> {
//! let monitor = Monitor::new(&Config::load()?)?;
//!
//! if let Some(reading) = monitor.readings().await {
//!     println!("Network mean: {:.3}", aggregate::network_mean(&reading)?);
//! }
//!
//! let closest = monitor.nearest(52.12, 23.80)?;
//! println!("{} is {:.0} m away", closest.station, closest.distance_m);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Query operations return [`Result<T, Error>`]. Transport and parse failures inside
//! [`Monitor`] are logged and reported as `None`, meaning "no data this cycle":
//!
//! ```rust
//! use radmon_core::{Catalog, Error, nearest};
//!
//! match nearest(Catalog::builtin(), f64::NAN, 27.5) {
//!     Err(Error::InvalidCoordinates { .. }) => {},
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

/// Region tables and network means
pub mod aggregate;
/// Time-bound memoizing cache
pub mod cache;
/// Built-in station and region reference data
pub mod catalog;
/// Layered configuration
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP retrieval of the monitoring documents
pub mod fetcher;
/// Cache-gated document access
pub mod monitor;
/// Nearest-station resolution
pub mod nearest;
/// Feed and narrative-page parsers
pub mod parser;
/// Core data types
pub mod types;

// Re-export commonly used types
pub use aggregate::{network_mean, region_summary, station_table};
pub use cache::{CacheStats, TimedCache};
pub use catalog::{Catalog, CatalogBuilder, Region, RegionId, Station};
pub use config::{CacheConfig, Config, FetchConfig, SourcesConfig};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use monitor::Monitor;
pub use nearest::nearest;
pub use parser::{parse_document, parse_narrative, parse_readings};
pub use types::{
    Document, DocumentKind, NearestStation, RawDocument, Reading, RegionSummary, SummaryRow,
};
