//! Outbound access to the publication origin.
//!
//! The origin serves the RSS feed and the article pages. Everything that talks
//! to the network goes through the [`Origin`] trait so the cache and the
//! extractor can be exercised against in-memory stubs.

use std::{error::Error, fmt, time::Duration};

use futures::future::BoxFuture;
use tracing::debug;

pub const DEFAULT_FEED_BASE_URL: &str = "https://trilogyai.substack.com";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub type OriginFuture<'a> = BoxFuture<'a, Result<String, OriginError>>;

#[derive(Debug)]
pub enum OriginError {
    Client(String),
    Request { url: String, message: String },
    Status { url: String, status: u16 },
}

impl fmt::Display for OriginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(message) => write!(f, "failed to build origin client: {message}"),
            Self::Request { url, message } => write!(f, "request to {url} failed: {message}"),
            Self::Status { url, status } => write!(f, "{url} answered with status {status}"),
        }
    }
}

impl Error for OriginError {}

/// Source of feed documents and article pages.
pub trait Origin: Send + Sync {
    /// Base URL of the publication, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Fetches the raw RSS document.
    fn fetch_feed(&self) -> OriginFuture<'_>;

    /// Fetches the raw markup of an article page.
    fn fetch_page<'a>(&'a self, url: &'a str) -> OriginFuture<'a>;
}

/// Configuration for the HTTP origin client.
#[derive(Debug, Clone)]
pub struct OriginConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl OriginConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: format!(
                "Mozilla/5.0 (compatible; pubfeed-mcp/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The RSS endpoint of the publication.
    #[must_use]
    pub fn feed_url(&self) -> String {
        format!("{}/feed", self.base_url)
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_BASE_URL)
    }
}

/// Origin backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct HttpOrigin {
    client: reqwest::Client,
    config: OriginConfig,
}

impl HttpOrigin {
    /// Builds the HTTP client with the configured timeout and user agent.
    ///
    /// # Errors
    /// Returns `OriginError::Client` if the TLS backend cannot be initialized.
    pub fn new(config: OriginConfig) -> Result<Self, OriginError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|err| OriginError::Client(err.to_string()))?;
        Ok(Self { client, config })
    }

    async fn get_text(&self, url: &str) -> Result<String, OriginError> {
        debug!(url, "fetching from origin");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| OriginError::Request {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OriginError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|err| OriginError::Request {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

impl Origin for HttpOrigin {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn fetch_feed(&self) -> OriginFuture<'_> {
        Box::pin(async move {
            let url = self.config.feed_url();
            self.get_text(&url).await
        })
    }

    fn fetch_page<'a>(&'a self, url: &'a str) -> OriginFuture<'a> {
        Box::pin(self.get_text(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = OriginConfig::new("https://example.substack.com/");
        assert_eq!(config.base_url, "https://example.substack.com");
        assert_eq!(config.feed_url(), "https://example.substack.com/feed");
    }

    #[test]
    fn defaults_use_bounded_timeout() {
        let config = OriginConfig::default();
        assert_eq!(config.timeout, DEFAULT_FETCH_TIMEOUT);
        assert!(config.user_agent.contains("pubfeed-mcp"));
    }

    #[test]
    fn http_origin_reports_its_base_url() {
        let origin = HttpOrigin::new(OriginConfig::new("https://example.com"))
            .expect("client should build");
        assert_eq!(origin.base_url(), "https://example.com");
    }
}
