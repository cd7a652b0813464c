//! Cache-gated access to the two monitoring documents.
//!
//! A [`Monitor`] owns the fetcher, the catalog and one [`TimedCache`] per document.
//! Callers ask for the current readings or narrative; a remote fetch happens only
//! when the cache watermark has passed. Failures surface as `None` ("no data this
//! cycle") and are not cached, so the next call tries again.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::cache::TimedCache;
use crate::catalog::Catalog;
use crate::config::{Config, SourcesConfig};
use crate::fetcher::Fetcher;
use crate::nearest::nearest;
use crate::parser::parse_document;
use crate::types::{Document, DocumentKind, NearestStation, Reading};
use crate::{Error, Result};

/// Refresh-and-query front end over the remote monitoring documents.
pub struct Monitor {
    fetcher: Fetcher,
    sources: SourcesConfig,
    catalog: Arc<Catalog>,
    readings: TimedCache<String, Reading>,
    narrative: TimedCache<String, String>,
}

impl Monitor {
    /// Build a monitor over the built-in station catalog.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_catalog(config, Arc::new(Catalog::builtin().clone()))
    }

    /// Build a monitor over a custom catalog.
    pub fn with_catalog(config: &Config, catalog: Arc<Catalog>) -> Result<Self> {
        let lifetime = config.cache.lifetime();
        let max_entries = config.cache.max_entries;
        Ok(Self {
            fetcher: Fetcher::from_config(&config.fetch)?,
            sources: config.sources.clone(),
            catalog,
            readings: TimedCache::new(lifetime, max_entries),
            narrative: TimedCache::new(lifetime, max_entries),
        })
    }

    /// Catalog readings are matched against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current station readings, or `None` if they could not be fetched or parsed.
    pub async fn readings(&self) -> Option<Reading> {
        self.try_readings()
            .await
            .inspect_err(|e| {
                warn!(
                    uri = %self.sources.readings_url,
                    category = e.category(),
                    "Readings unavailable: {e}"
                );
            })
            .ok()
    }

    /// Current station readings with the reason for any failure.
    pub async fn try_readings(&self) -> Result<Reading> {
        let uri = &self.sources.readings_url;
        self.readings
            .get_or_try_insert_with(uri.clone(), || self.load_readings(uri))
            .await
    }

    /// Current narrative status, or `None` if the page could not be fetched or parsed.
    ///
    /// A page that is reachable but has no recognizable status paragraph yields the
    /// default narrative, not `None`.
    pub async fn narrative(&self) -> Option<String> {
        self.try_narrative()
            .await
            .inspect_err(|e| {
                warn!(
                    uri = %self.sources.narrative_url,
                    category = e.category(),
                    "Narrative unavailable: {e}"
                );
            })
            .ok()
    }

    /// Current narrative status with the reason for any failure.
    pub async fn try_narrative(&self) -> Result<String> {
        let uri = &self.sources.narrative_url;
        self.narrative
            .get_or_try_insert_with(uri.clone(), || self.load_narrative(uri))
            .await
    }

    /// Closest catalog station to a coordinate. Never touches the network.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Result<NearestStation> {
        nearest(&self.catalog, latitude, longitude)
    }

    /// Drop every cached document so the next query refetches.
    pub async fn invalidate(&self) {
        self.readings.clear().await;
        self.narrative.clear().await;
        debug!("Monitor caches cleared");
    }

    #[instrument(skip(self))]
    async fn load_readings(&self, uri: &str) -> Result<Reading> {
        match self.load(uri).await? {
            Document::Readings(parsed) => Ok(Reading::from_parsed(&self.catalog, parsed)),
            Document::Narrative(_) => Err(Error::Parse(format!(
                "Expected a {} at {uri}",
                DocumentKind::StructuredFeed
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn load_narrative(&self, uri: &str) -> Result<String> {
        match self.load(uri).await? {
            Document::Narrative(text) => Ok(text),
            Document::Readings(_) => Err(Error::Parse(format!(
                "Expected a {} at {uri}",
                DocumentKind::NarrativePage
            ))),
        }
    }

    async fn load(&self, uri: &str) -> Result<Document> {
        let raw = self.fetcher.try_fetch(uri).await?;
        parse_document(&raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::parser::DEFAULT_NARRATIVE;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const FEED: &str = r"<rss><channel>
        <item><title>Радиационный мониторинг</title></item>
        <item><title>Минск</title><rad>0.11</rad></item>
        <item><title>Гомель</title><rad>0.14</rad></item>
        <item><title>Атлантида</title><rad>9.99</rad></item>
    </channel></rss>";

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.sources.readings_url = format!("{}/radiation.xml", server.uri());
        config.sources.narrative_url = format!("{}/monitoring/radiation", server.uri());
        config
    }

    #[tokio::test]
    async fn test_readings_are_catalog_filtered_and_cached() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/radiation.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .expect(1)
            .mount(&server)
            .await;

        let monitor = Monitor::new(&config_for(&server))?;
        let first = monitor.readings().await.unwrap();
        let second = monitor.readings().await.unwrap();

        assert_eq!(first.get("Минск"), Some(0.11));
        assert_eq!(first.get("Гомель"), Some(0.14));
        assert!(!first.contains("Атлантида"));
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_failures_are_none_and_retried() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/radiation.xml"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let monitor = Monitor::new(&config_for(&server))?;
        assert!(monitor.readings().await.is_none());
        assert!(monitor.readings().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_feed_is_none() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/radiation.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<item><title>Минск</title><rad>n/a</rad></item>"),
            )
            .mount(&server)
            .await;

        let monitor = Monitor::new(&config_for(&server))?;
        assert!(matches!(
            monitor.try_readings().await,
            Err(Error::Parse(_))
        ));
        assert!(monitor.readings().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_narrative_default_and_invalidate() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/radiation"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Нет данных</p>"))
            .expect(2)
            .mount(&server)
            .await;

        let monitor = Monitor::new(&config_for(&server))?;
        assert_eq!(monitor.narrative().await.as_deref(), Some(DEFAULT_NARRATIVE));
        assert_eq!(monitor.narrative().await.as_deref(), Some(DEFAULT_NARRATIVE));

        monitor.invalidate().await;
        assert!(monitor.narrative().await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_narrative_is_none() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/radiation"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<p>Радиационная <!-- unterminated"),
            )
            .mount(&server)
            .await;

        let monitor = Monitor::new(&config_for(&server))?;
        assert!(monitor.narrative().await.is_none());
        assert!(matches!(
            monitor.try_narrative().await,
            Err(Error::Parse(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_readings_url_must_be_feed() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/readings"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>text</p>"))
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.sources.readings_url = format!("{}/readings", server.uri());
        let monitor = Monitor::new(&config)?;
        assert!(matches!(
            monitor.try_readings().await,
            Err(Error::Parse(_))
        ));
        Ok(())
    }

    #[test]
    fn test_nearest_is_offline() {
        let monitor = Monitor::new(&Config::default()).unwrap();
        let found = monitor.nearest(53.9045, 27.5615).unwrap();
        assert_eq!(found.station, "Минск");
    }
}
