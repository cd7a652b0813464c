//! Configuration for the monitoring pipeline.
//!
//! Configuration is stored in TOML and resolved in three layers:
//!
//! 1. **Defaults** ([`Config::default`])
//! 2. **File**: `$RADMON_CONFIG` if set, otherwise the platform config directory
//!    (`~/.config/radmon/config.toml` on Linux)
//! 3. **Environment variables**: `RADMON_READINGS_URL`, `RADMON_NARRATIVE_URL`,
//!    `RADMON_CACHE_LIFETIME_SECS`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [sources]
//! readings_url = "https://rad.org.by/radiation.xml"
//! narrative_url = "https://rad.org.by/monitoring/radiation"
//!
//! [fetch]
//! connect_timeout_ms = 500
//! request_timeout_ms = 5000
//!
//! [cache]
//! lifetime_secs = 600
//! max_entries = 16
//! ```
//!
//! ```rust
//! use radmon_core::Config;
//!
//! let config: Config = toml::from_str("[cache]\nlifetime_secs = 60\n").unwrap();
//! assert_eq!(config.cache.lifetime_secs, 60);
//! assert_eq!(config.fetch.connect_timeout_ms, 500);
//! config.validate().unwrap();
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RADMON_CONFIG";
/// Environment override for [`SourcesConfig::readings_url`].
pub const READINGS_URL_ENV: &str = "RADMON_READINGS_URL";
/// Environment override for [`SourcesConfig::narrative_url`].
pub const NARRATIVE_URL_ENV: &str = "RADMON_NARRATIVE_URL";
/// Environment override for [`CacheConfig::lifetime_secs`].
pub const CACHE_LIFETIME_ENV: &str = "RADMON_CACHE_LIFETIME_SECS";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote document locations.
    pub sources: SourcesConfig,
    /// HTTP behavior.
    pub fetch: FetchConfig,
    /// Refresh cadence.
    pub cache: CacheConfig,
}

/// The two remote documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Structured station feed (must end in `.xml`).
    pub readings_url: String,
    /// Narrative status page.
    pub narrative_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            readings_url: "https://rad.org.by/radiation.xml".to_string(),
            narrative_url: "https://rad.org.by/monitoring/radiation".to_string(),
        }
    }
}

/// Timeouts for outbound requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl FetchConfig {
    /// Connect timeout as a [`Duration`].
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 500,
            request_timeout_ms: 5_000,
        }
    }
}

/// Cache policy for fetched documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched snapshot is served before the next call refetches.
    pub lifetime_secs: u64,
    /// Maximum distinct keys per cache.
    pub max_entries: usize,
}

impl CacheConfig {
    /// Lifetime as a [`Duration`].
    pub const fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lifetime_secs: 600,
            max_entries: 16,
        }
    }
}

impl Config {
    /// Load configuration from `$RADMON_CONFIG` or the default location, then apply
    /// environment overrides.
    ///
    /// A missing file at the default location is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_with(explicit.as_deref())
    }

    /// Like [`load`](Self::load), but with an explicit file taking the place of
    /// `$RADMON_CONFIG`. An explicit file must exist.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {e}", path.display()))
        })
    }

    /// Platform config path, e.g. `~/.config/radmon/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("by", "radmon", "radmon")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(READINGS_URL_ENV) {
            self.sources.readings_url = url;
        }
        if let Some(url) = lookup(NARRATIVE_URL_ENV) {
            self.sources.narrative_url = url;
        }
        if let Some(secs) = lookup(CACHE_LIFETIME_ENV) {
            self.cache.lifetime_secs = secs.trim().parse().map_err(|_| {
                Error::Config(format!("{CACHE_LIFETIME_ENV} must be an integer, got '{secs}'"))
            })?;
        }
        Ok(())
    }

    /// Check that URLs parse and timeouts are non-zero.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("sources.readings_url", &self.sources.readings_url),
            ("sources.narrative_url", &self.sources.narrative_url),
        ] {
            let url = url::Url::parse(value)
                .map_err(|e| Error::InvalidUrl(format!("{name} = '{value}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::InvalidUrl(format!(
                    "{name} = '{value}': expected http or https"
                )));
            }
        }

        if self.fetch.connect_timeout_ms == 0 || self.fetch.request_timeout_ms == 0 {
            return Err(Error::Config("Fetch timeouts must be greater than zero".into()));
        }

        Ok(())
    }

    /// Save the configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
