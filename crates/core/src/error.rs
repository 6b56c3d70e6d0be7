//! Error type shared by the loader, assembler and output writers.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning an edit log into a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edit log {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("history entry {index} ({file_name}) has no timestamp")]
    MissingTimestamp { index: usize, file_name: String },

    #[error("history mixes numeric and text timestamps")]
    MixedTimestamps,

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
