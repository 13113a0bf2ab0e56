//! Content sources, the load cycle, and the published content store.
//!
//! The [`ContentStore`] owns the only writable copy of the site content.
//! It fetches every expected resource through a [`ContentSource`], turns
//! the results into one [`ContentSnapshot`](atelier_content::ContentSnapshot)
//! and publishes it atomically. Consumers read or subscribe; they never
//! fetch on their own.
//!
//! # Modules
//!
//! - [`source`]: the fetch abstraction and its HTTP, filesystem, mock and
//!   retry implementations
//! - [`loader`]: one load cycle, from fetch to assembled snapshot
//! - [`store`]: the store with snapshot/subscribe/refresh
//! - [`trigger`]: debounced refresh on external change signals
//! - [`sync_marker`]: the optional marker written by the content sync job

pub mod loader;
pub mod source;
pub mod store;
pub mod sync_marker;
pub mod trigger;

pub use loader::{load_snapshot, CycleReport};
pub use source::{ContentSource, FsSource, HttpSource, MockResponse, MockSource, RetrySource};
pub use store::{ContentStore, RefreshOutcome};
pub use sync_marker::{SyncMarker, DEFAULT_SYNC_MARKER_PATH};
pub use trigger::{ChangeSignal, ChangeTrigger, TriggerConfig, TriggerOutcome};
