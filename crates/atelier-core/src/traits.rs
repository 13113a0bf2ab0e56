//! Core traits for Atelier configuration.
//!
//! The store and the CLI never read configuration files directly; they go
//! through [`ConfigProvider`], which answers where content lives and what
//! the project is called.

use std::path::PathBuf;

use crate::Result;

/// Where the markdown resources are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    /// An HTTP content root, e.g. `https://example.com/content`.
    Remote(String),
    /// A local directory mirroring the content root layout.
    Local(PathBuf),
}

impl ContentLocation {
    /// Human-readable form for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

/// Trait for application configuration.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across tasks
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use atelier_core::{ConfigProvider, ContentLocation, Result};
///
/// #[derive(Clone)]
/// struct SiteConfig {
///     base_url: String,
/// }
///
/// impl ConfigProvider for SiteConfig {
///     fn project_name(&self) -> &str {
///         "hs-planning"
///     }
///
///     fn content_location(&self) -> Result<ContentLocation> {
///         Ok(ContentLocation::Remote(self.base_url.clone()))
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used in log lines and default paths.
    fn project_name(&self) -> &str;

    /// Where content resources are fetched from.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a remote nor a local root is configured,
    /// or if the configured value cannot be resolved.
    fn content_location(&self) -> Result<ContentLocation>;
}
