//! Content source abstraction.

use std::sync::Arc;

use async_trait::async_trait;

use atelier_core::Result;

/// Abstraction over where markdown resources come from.
///
/// This trait allows swapping the content host (HTTP, local directory,
/// in-memory fixtures) without changing the load cycle.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one resource by its path relative to the content root
    /// (e.g. `/hero/hero.md`) and return its text.
    ///
    /// A missing resource or a non-success response is an error; the
    /// caller decides whether that is fatal.
    async fn fetch(&self, path: &str) -> Result<String>;

    /// Short description for log lines.
    fn describe(&self) -> String {
        "content source".to_string()
    }
}

#[async_trait]
impl<S: ContentSource + ?Sized> ContentSource for Arc<S> {
    async fn fetch(&self, path: &str) -> Result<String> {
        (**self).fetch(path).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
