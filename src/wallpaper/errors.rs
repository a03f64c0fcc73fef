use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised at the persistence and fetch seams of the wallpaper module.
///
/// These never cross the public service boundary: the service logs and
/// absorbs them, leaving the state renderable. They exist so providers and
/// fetch adapters can report failures precisely.
#[derive(Error, Debug)]
pub enum WallpaperStateError {
    #[error("Persistence error during '{operation}': {message}")]
    Persistence {
        operation: String,
        message: String,
        #[source]
        source: Option<StorageError>,
    },

    #[error("Serialization error for record '{record}': {source}")]
    Serialization {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Deserialization error for record '{record}': {source}")]
    Deserialization {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Remote image fetch failed: {message}")]
    Fetch { message: String },
}

impl WallpaperStateError {
    pub fn persistence(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: Option<StorageError>,
    ) -> Self {
        WallpaperStateError::Persistence {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        WallpaperStateError::Fetch {
            message: message.into(),
        }
    }
}
