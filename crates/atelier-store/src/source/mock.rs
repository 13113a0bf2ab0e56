//! In-memory content source for tests and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::provider::ContentSource;
use atelier_core::{Error, Result};

/// Canned answer for one resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Successful fetch with this body.
    Body(String),
    /// Non-success response with this HTTP status.
    Status(u16),
    /// Transport failure.
    NetworkError,
}

/// Content source that serves canned responses from memory.
///
/// Paths without a canned response answer `404` unless
/// [`failing`](Self::failing) changed the default. Every fetch is counted,
/// including failed ones.
///
/// # Examples
///
/// ```
/// use atelier_store::{ContentSource, MockSource};
///
/// # tokio_test::block_on(async {
/// let source = MockSource::new().with_body("/hero/hero.md", "---\ntitle: Hi\n---");
/// assert!(source.fetch("/hero/hero.md").await.is_ok());
/// assert!(source.fetch("/about/about.md").await.is_err());
/// assert_eq!(source.fetch_count(), 2);
/// # });
/// ```
#[derive(Debug)]
pub struct MockSource {
    responses: RwLock<HashMap<String, MockResponse>>,
    default_response: MockResponse,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Creates an empty mock where every path answers `404`.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default_response: MockResponse::Status(404),
            latency: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Creates a mock where every unknown path fails at the transport level.
    pub fn failing() -> Self {
        Self {
            default_response: MockResponse::NetworkError,
            ..Self::new()
        }
    }

    /// Serves `body` for `path`.
    pub fn with_body(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(path, MockResponse::Body(body.into()))
    }

    /// Serves an arbitrary response for `path`.
    pub fn with_response(mut self, path: impl Into<String>, response: MockResponse) -> Self {
        self.responses.get_mut().insert(path.into(), response);
        self
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replaces the response for `path` on a shared mock.
    pub async fn set(&self, path: impl Into<String>, response: MockResponse) {
        self.responses.write().await.insert(path.into(), response);
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let response = self
            .responses
            .read()
            .await
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status) => Err(Error::unavailable(path, Some(status))),
            MockResponse::NetworkError => Err(Error::http(format!("mock network error for {path}"))),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
