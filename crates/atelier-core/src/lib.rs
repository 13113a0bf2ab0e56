//! Atelier Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Atelier crates.
//! It has no internal Atelier dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction shared by the store and the CLI
//! - [`util`]: File and path utilities

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::{ConfigProvider, ContentLocation};
