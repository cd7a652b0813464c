use crate::config::FetchConfig;
use crate::types::{DocumentKind, RawDocument};
use crate::{Error, Result};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default timeout for the whole request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client identifiers rotated across requests.
const USER_AGENTS: &[&str] = &[
    concat!("radmon/", env!("CARGO_PKG_VERSION")),
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
];

/// HTTP client for the monitoring documents.
///
/// Each call performs exactly one bounded request. Failures are never retried here;
/// the caller simply asks again on its next cycle.
pub struct Fetcher {
    client: Client,
    next_agent: AtomicUsize,
}

impl Fetcher {
    /// Creates a fetcher with the default timeouts.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a fetcher from configuration.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::with_timeouts(config.connect_timeout(), config.request_timeout())
    }

    /// Creates a fetcher with custom timeouts (primarily for tests)
    pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            next_agent: AtomicUsize::new(0),
        })
    }

    /// Fetches `uri`, logging and swallowing any failure.
    ///
    /// Returns `None` on transport errors, timeouts, and any status other than
    /// 200 or 201.
    pub async fn fetch(&self, uri: &str) -> Option<RawDocument> {
        match self.try_fetch(uri).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(
                    uri,
                    category = e.category(),
                    recoverable = e.is_recoverable(),
                    "Fetch failed: {e}"
                );
                None
            },
        }
    }

    /// Fetches `uri`, reporting why a failure happened.
    #[instrument(skip(self))]
    pub async fn try_fetch(&self, uri: &str) -> Result<RawDocument> {
        let url = url::Url::parse(uri).map_err(|e| Error::InvalidUrl(format!("{uri}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{uri}: unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let agent = self.next_user_agent();
        debug!(agent, "Requesting document");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .send()
            .await
            .map_err(|e| map_transport_error(uri, e))?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(Error::UnexpectedStatus {
                url: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(uri, e))?;

        let kind = DocumentKind::from_uri(uri);
        info!("Fetched {} bytes ({kind}) from {uri}", body.len());

        Ok(RawDocument {
            uri: uri.to_string(),
            kind,
            body,
        })
    }

    fn next_user_agent(&self) -> &'static str {
        let index = self.next_agent.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[index % USER_AGENTS.len()]
    }
}

fn map_transport_error(uri: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("Request to '{uri}' timed out"))
    } else {
        Error::Network(err)
    }
}
