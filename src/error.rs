//! Error types for the library surface. Application glue (`main.rs`, the UI
//! loop) wraps these in `anyhow` with extra context.

use std::io;

use thiserror::Error;

/// The catalog resource could not be retrieved. The view-model treats this as
/// terminal for the session: nothing retries it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read song list {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to fetch songs from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch songs: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Song list loader stopped before delivering a result")]
    LoaderStopped,
}

/// Persistent favorites storage is unusable. Callers log it and keep going.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Stored favorites are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

/// Failures of the offline CSV conversion.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Could not find Languages column in CSV file")]
    MissingLanguageColumn,

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}
