//! Utility modules for file operations and path handling.
//!
//! # Modules
//!
//! - [`files`]: Async file discovery, reading and copying utilities
//! - [`paths`]: Path resolution helpers (tilde and env expansion)

pub mod files;
pub mod paths;
