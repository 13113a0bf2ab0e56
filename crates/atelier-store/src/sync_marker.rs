//! Marker file written by the content sync job.
//!
//! The sync job copies markdown from the editing directory into the public
//! content root and then writes `/.content-sync.json`. The store reads the
//! marker opportunistically for logging; a missing or malformed marker is
//! never an error for a load cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use atelier_core::{Error, Result};

use crate::source::ContentSource;

/// Path of the marker relative to the content root.
pub const DEFAULT_SYNC_MARKER_PATH: &str = "/.content-sync.json";

/// When content was last synced, and by what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMarker {
    /// Completion time of the last sync.
    pub last_sync: DateTime<Utc>,
    /// Free-form note from the sync job.
    #[serde(default)]
    pub message: String,
}

impl SyncMarker {
    /// A marker stamped with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            last_sync: Utc::now(),
            message: message.into(),
        }
    }

    /// Parse a marker from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::serialization(format!("invalid sync marker: {e}")))
    }

    /// Render the marker as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::serialization(e.to_string()))
    }
}

/// Fetch and parse the marker, if the source has a usable one.
pub async fn read_sync_marker(source: &dyn ContentSource, path: &str) -> Option<SyncMarker> {
    let text = match source.fetch(path).await {
        Ok(text) => text,
        Err(e) => {
            debug!(path, error = %e, "no sync marker");
            return None;
        }
    };
    match SyncMarker::from_json(&text) {
        Ok(marker) => Some(marker),
        Err(e) => {
            debug!(path, error = %e, "ignoring unreadable sync marker");
            None
        }
    }
}
