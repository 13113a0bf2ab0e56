//! HTTP content source.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::provider::ContentSource;
use atelier_core::{Error, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches resources from the site's public content root over HTTP.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source rooted at `base_url` with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Content root, e.g. `https://example.com` or
    ///   `http://localhost:3000/content`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a source with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http_with_source("Failed to build HTTP client", e))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Creates a source around an existing client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// Content root this source fetches from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        debug!(%url, "fetching content resource");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::http_with_source(format!("GET {url} failed"), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::unavailable(path, Some(status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http_with_source(format!("Failed to read body of {url}"), e))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
