//! Retry wrapper for content sources.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

use super::provider::ContentSource;
use atelier_core::{Error, Result};

/// Wraps a content source with retry on transient failures.
///
/// Missing resources (`404`, absent files) are never retried; they are a
/// normal outcome for optional content.
pub struct RetrySource {
    inner: Arc<dyn ContentSource>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetrySource {
    /// Creates a new retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max retries: 2
    /// - Initial delay: 200 milliseconds
    /// - Max delay: 2 seconds
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            inner: source,
            max_attempts: 2,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }

    /// Sets the maximum number of retries after the first attempt.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn should_retry(error: &Error) -> bool {
        error.is_retryable()
    }
}

#[async_trait]
impl ContentSource for RetrySource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts as usize);

        let source = &self.inner;
        (|| async { source.fetch(path).await })
            .retry(backoff)
            .when(Self::should_retry)
            .notify(|err: &Error, delay: Duration| {
                warn!(path, error = %err, ?delay, "retrying content fetch");
            })
            .await
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::{MockResponse, MockSource};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the given status a fixed number of times, then succeeds.
    struct FlakySource {
        failures_left: AtomicU32,
        status: u16,
        calls: AtomicU32,
    }

    impl FlakySource {
        fn new(failures: u32, status: u16) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                status,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentSource for FlakySource {
        async fn fetch(&self, path: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(Error::unavailable(path, Some(self.status)));
            }
            Ok("recovered".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_status() {
        let flaky = Arc::new(FlakySource::new(2, 503));
        let retry = RetrySource::new(flaky.clone());

        assert_eq!(retry.fetch("/hero/hero.md").await.unwrap(), "recovered");
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let flaky = Arc::new(FlakySource::new(10, 500));
        let retry = RetrySource::new(flaky.clone()).with_max_attempts(1);

        let err = retry.fetch("/hero/hero.md").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_retry_not_found() {
        let mock = Arc::new(MockSource::new().with_response("/a.md", MockResponse::Status(404)));
        let retry = RetrySource::new(mock.clone()).with_max_attempts(5);

        assert!(retry.fetch("/a.md").await.is_err());
        assert_eq!(mock.fetch_count(), 1);
    }

    #[test]
    fn test_retry_source_builder() {
        let retry = RetrySource::new(Arc::new(MockSource::new()))
            .with_max_attempts(5)
            .with_initial_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(30));

        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.initial_delay, Duration::from_millis(500));
        assert_eq!(retry.max_delay, Duration::from_secs(30));
        assert_eq!(retry.describe(), "mock");
    }
}
