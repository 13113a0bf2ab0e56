//! Error types for Atelier operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Atelier crates. Uses `thiserror` for derive macros.

use std::path::Path;

use thiserror::Error;

/// Boxed error source carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in Atelier operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoPath {
        /// Path being accessed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A content resource answered with a non-success status.
    #[error("Resource unavailable: {path}{}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Unavailable {
        /// Resource path relative to the content root.
        path: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
    },

    /// Transport-level failure talking to the content host.
    #[error("HTTP error: {message}")]
    Http {
        /// Human-readable context.
        message: String,
        /// Underlying transport error.
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Create an I/O error annotated with the path that failed.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().display().to_string(),
            source: err,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an unavailable-resource error.
    pub fn unavailable(path: impl Into<String>, status: Option<u16>) -> Self {
        Self::Unavailable {
            path: path.into(),
            status,
        }
    }

    /// Create a transport error without an underlying source.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping its cause.
    pub fn http_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Http {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Transport failures and 5xx/429 responses are transient; everything
    /// else (missing files, bad data, configuration) is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Unavailable {
                status: Some(status),
                ..
            } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unavailable { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias using Atelier's Error type.
pub type Result<T> = std::result::Result<T, Error>;
