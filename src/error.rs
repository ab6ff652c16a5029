//! Typed errors for the snapshot pipeline.
//!
//! Each stage has its own error type so callers can decide what is fatal:
//! - [`FetchError`]: the listing page could not be retrieved
//! - [`ExtractError`]: a record did not have the expected markup shape
//! - [`SinkWriteError`]: an entry could not be persisted
//! - [`PipelineError`]: what a category parser or the manager gives up with

use std::path::PathBuf;
use thiserror::Error;

/// Transport failure while fetching a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failure to pull a field out of a single record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The nested markup that should hold the field is absent.
    #[error("field not found: {field}")]
    FieldNotFound { field: &'static str },

    /// The date label is present but is not `YYYY-MM-DD...`.
    #[error("malformed date {raw:?}: {reason}")]
    DateParse { raw: String, reason: String },
}

impl ExtractError {
    pub fn missing(field: &'static str) -> Self {
        Self::FieldNotFound { field }
    }
}

/// Failure to persist one entry.
#[derive(Debug, Error)]
pub enum SinkWriteError {
    #[error("write to {} failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database write failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serializing entry failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a category parser, and with it the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{group}/{category}: record {index}: {source}")]
    Record {
        group: String,
        category: &'static str,
        index: usize,
        #[source]
        source: ExtractError,
    },

    #[error("run cancelled")]
    Cancelled,
}
