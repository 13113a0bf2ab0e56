//! Filesystem content source.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::provider::ContentSource;
use atelier_core::util::files::{exists, read_file};
use atelier_core::{Error, Result};

/// Reads resources from a local content directory laid out like the
/// public content root (`hero/hero.md`, `services/<name>.md`, ...).
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(Error::invalid_data(format!(
                "resource path '{path}' escapes the content root"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let file = self.resolve(path)?;
        debug!(path = %file.display(), "reading content resource");
        if !exists(&file).await {
            return Err(Error::unavailable(path, None));
        }
        read_file(&file).await
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_reads_relative_to_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("hero")).unwrap();
        std::fs::write(dir.path().join("hero/hero.md"), "---\ntitle: Local\n---").unwrap();

        let source = FsSource::new(dir.path());
        let body = source.fetch("/hero/hero.md").await.unwrap();
        assert!(body.contains("title: Local"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = FsSource::new(dir.path());
        let err = source.fetch("/services/party-wall.md").await.unwrap_err();
        assert!(matches!(err, Error::Unavailable { status: None, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_rejects_parent_components() {
        let dir = TempDir::new().unwrap();
        let source = FsSource::new(dir.path().join("content"));
        let err = source.fetch("/../secret.md").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_describe_is_root() {
        let source = FsSource::new("/srv/content");
        assert_eq!(source.describe(), "/srv/content");
        assert_eq!(source.root(), Path::new("/srv/content"));
    }
}
