//! Error types and handling for radmon-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. The fetch and parse
//! layers never let these errors escape to callers of [`crate::Monitor`]; they are
//! logged there and turned into "no data this cycle". Query-side errors
//! ([`Error::EmptyAggregation`], [`Error::InvalidCoordinates`]) are returned as-is.
//!
//! ## Error Categories
//!
//! - **Transport**: [`Error::Network`], [`Error::Timeout`], [`Error::UnexpectedStatus`]
//! - **Parse**: [`Error::Parse`], [`Error::Serialization`]
//! - **Domain**: [`Error::EmptyAggregation`]
//! - **Input**: [`Error::InvalidCoordinates`], [`Error::InvalidUrl`], [`Error::NotFound`]
//! - **Configuration**: [`Error::Config`], [`Error::Io`]
//!
//! ```rust
//! use radmon_core::Error;
//!
//! let err = Error::EmptyAggregation { scope: "Брестская область".into() };
//! assert_eq!(err.category(), "domain");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for radmon-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed, typically while reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request could not complete.
    ///
    /// Connection and timeout failures are recoverable on the next refresh cycle.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status other than 200 or 201.
    #[error("Unexpected HTTP status {status} from '{url}'")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Status code returned by the server.
        status: u16,
    },

    /// Payload was present but not in the expected shape.
    ///
    /// Covers malformed XML, non-numeric dose-rate values and title/value count
    /// mismatches in the station feed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested station or region does not exist in the catalog.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation exceeded its time budget.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An average was requested over zero readings.
    ///
    /// Returned when a region has no station present in the current snapshot, or
    /// when the snapshot itself is empty.
    #[error("No readings available for {scope}")]
    EmptyAggregation {
        /// What was being averaged (a region name or "network").
        scope: String,
    },

    /// Coordinates are not finite or lie outside the valid latitude range.
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates {
        /// Latitude as supplied.
        latitude: f64,
        /// Longitude as supplied.
        longitude: f64,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse(format!("XML parse error: {err}"))
    }
}

impl Error {
    /// Check if the error might go away on the next refresh cycle.
    ///
    /// Transport failures (timeouts, refused connections, 5xx statuses) are
    /// recoverable. Parse, domain and input errors are not: retrying with the same
    /// inputs produces the same result.
    ///
    /// ```rust
    /// use radmon_core::Error;
    ///
    /// assert!(Error::Timeout("read".into()).is_recoverable());
    /// assert!(Error::UnexpectedStatus { url: "u".into(), status: 503 }.is_recoverable());
    /// assert!(!Error::UnexpectedStatus { url: "u".into(), status: 404 }.is_recoverable());
    /// assert!(!Error::Parse("bad".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a static identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::UnexpectedStatus { .. } => "network",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::EmptyAggregation { .. } => "domain",
            Self::InvalidCoordinates { .. } => "input",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
