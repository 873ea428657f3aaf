use crate::{Error, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default request timeout for page fetches
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent sent with page fetches
pub const DEFAULT_USER_AGENT: &str = concat!("site-monitor/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the current body of a page.
///
/// [`Fetcher`] is the HTTP implementation; the monitor only depends on this
/// trait.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the page body as raw bytes
    async fn fetch_page(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP client for retrieving monitored pages
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default timeout and user agent
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(timeout, DEFAULT_USER_AGENT)
    }

    /// Creates a fetcher from the `[fetch]` configuration section
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let timeout = config.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        Self::build(timeout, user_agent)
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches a URL and returns its body exactly as received.
    ///
    /// Any non-success status is an error, so a broken page is never
    /// mistaken for an unchanged one.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            // Map 404 to a clearer NotFound error
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "Page not found at '{url}' (HTTP 404)"
                )));
            }

            if let Err(err) = response.error_for_status_ref() {
                return Err(Error::Network(err));
            }
            return Err(Error::UnexpectedStatus(format!(
                "'{url}' answered with HTTP {status}"
            )));
        }

        let body = response.bytes().await?.to_vec();
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch(url).await
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.

/// Checks that `url` is an absolute http(s) URL
pub fn validate_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("'{trimmed}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {},
        other => {
            return Err(Error::InvalidUrl(format!(
                "'{trimmed}': unsupported scheme '{other}' (expected http or https)"
            )));
        },
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::InvalidUrl(format!("'{trimmed}': missing host")));
    }

    Ok(parsed)
}
