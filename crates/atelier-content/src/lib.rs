//! Frontmatter parsing, section model, and content defaults.
//!
//! This crate is pure: it never performs I/O. The store crate fetches raw
//! markdown and hands it here to become typed sections.
//!
//! # Modules
//!
//! - [`frontmatter`]: the canonical `---` block parser
//! - [`value`]: scalar values and flat records produced by the parser
//! - [`resources`]: content categories and the fixed resource descriptor
//! - [`model`]: typed sections and the published [`ContentSnapshot`]
//! - [`defaults`]: built-in fallback content

pub mod defaults;
pub mod frontmatter;
pub mod model;
pub mod resources;
pub mod value;

pub use frontmatter::{parse_frontmatter, split_frontmatter};
pub use model::{About, ContentSnapshot, Footer, FooterLink, GalleryItem, Hero, Project, Service};
pub use resources::{Category, ResourceDescriptor};
pub use value::{FrontmatterRecord, FrontmatterValue};
