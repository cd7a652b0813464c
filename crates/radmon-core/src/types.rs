//! Core data types shared by the fetch, parse and query layers.

use crate::catalog::Catalog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Which markup dialect a remote document is written in.
///
/// Resolved once, at the fetch boundary, from the URI path: documents ending in
/// `.xml` are the structured station feed, anything else is the narrative page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Machine-readable feed of `<title>`/`<rad>` pairs.
    StructuredFeed,
    /// Human-readable HTML page carrying the status paragraph.
    NarrativePage,
}

impl DocumentKind {
    /// Classify a document by the suffix of its URI path.
    ///
    /// Query strings and fragments are ignored. URIs that do not parse are
    /// classified by their raw text.
    ///
    /// ```rust
    /// use radmon_core::DocumentKind;
    ///
    /// assert_eq!(
    ///     DocumentKind::from_uri("https://rad.org.by/radiation.xml?v=2"),
    ///     DocumentKind::StructuredFeed
    /// );
    /// assert_eq!(
    ///     DocumentKind::from_uri("https://rad.org.by/monitoring/radiation"),
    ///     DocumentKind::NarrativePage
    /// );
    /// ```
    pub fn from_uri(uri: &str) -> Self {
        let path = url::Url::parse(uri)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| uri.split(['?', '#']).next().unwrap_or(uri).to_string());

        if path.to_ascii_lowercase().ends_with(".xml") {
            Self::StructuredFeed
        } else {
            Self::NarrativePage
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuredFeed => f.write_str("structured feed"),
            Self::NarrativePage => f.write_str("narrative page"),
        }
    }
}

/// A fetched payload together with its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// URI the payload was retrieved from.
    pub uri: String,
    /// Markup dialect of the payload.
    pub kind: DocumentKind,
    /// Response body.
    pub body: String,
}

/// Parsed form of a [`RawDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Station name to dose rate, as found in the feed (not yet catalog-filtered).
    Readings(BTreeMap<String, f64>),
    /// Cleaned status paragraph.
    Narrative(String),
}

/// Snapshot of dose-rate values (µSv/h) keyed by station name.
///
/// Every key is a station of the catalog the snapshot was built against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    values: BTreeMap<String, f64>,
    fetched_at: DateTime<Utc>,
}

impl Reading {
    /// Build a snapshot, silently dropping names the catalog does not know.
    pub fn from_parsed(catalog: &Catalog, parsed: BTreeMap<String, f64>) -> Self {
        let values = parsed
            .into_iter()
            .filter(|(name, _)| {
                let known = catalog.contains(name);
                if !known {
                    debug!(station = %name, "Dropping reading for unknown station");
                }
                known
            })
            .collect();

        Self {
            values,
            fetched_at: Utc::now(),
        }
    }

    /// Dose rate at `station`, if present in this snapshot.
    pub fn get(&self, station: &str) -> Option<f64> {
        self.values.get(station).copied()
    }

    /// Whether `station` has a value in this snapshot.
    pub fn contains(&self, station: &str) -> bool {
        self.values.contains_key(station)
    }

    /// Iterate `(station, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterate the dose-rate values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    /// Number of stations with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// When the snapshot was produced.
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// One line of a region table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Station name.
    pub station: String,
    /// Station name fitted to the table column width.
    pub label: String,
    /// Dose rate in µSv/h.
    pub value: f64,
}

/// Readings of one region with their arithmetic mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    /// Region name.
    pub region: String,
    /// Rows in catalog declaration order.
    pub rows: Vec<SummaryRow>,
    /// Mean over `rows`.
    pub mean: f64,
}

/// Result of a nearest-station lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStation {
    /// Geodesic distance in metres, rounded to the millimetre.
    pub distance_m: f64,
    /// Name of the closest station.
    pub station: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_from_uri() {
        assert_eq!(
            DocumentKind::from_uri("https://example.org/feed/RADIATION.XML"),
            DocumentKind::StructuredFeed
        );
        assert_eq!(
            DocumentKind::from_uri("https://example.org/xml/status"),
            DocumentKind::NarrativePage
        );
        assert_eq!(
            DocumentKind::from_uri("https://example.org/status.html#radiation.xml"),
            DocumentKind::NarrativePage
        );
        assert_eq!(
            DocumentKind::from_uri("local/radiation.xml?ts=1"),
            DocumentKind::StructuredFeed
        );
    }

    #[test]
    fn test_reading_drops_unknown_stations() {
        let catalog = Catalog::builder()
            .region("R")
            .station("Брест", 52.0976, 23.7341)
            .build()
            .unwrap();
        let parsed = BTreeMap::from([
            ("Брест".to_string(), 0.11),
            ("Атлантида".to_string(), 0.50),
        ]);

        let reading = Reading::from_parsed(&catalog, parsed);
        assert_eq!(reading.len(), 1);
        assert_eq!(reading.get("Брест"), Some(0.11));
        assert!(!reading.contains("Атлантида"));
    }
}
