use std::path::PathBuf;

use thiserror::Error;

use crate::browser::error::AccessError;

/// Failure to write or read an export file.
///
/// Writers only borrow the records, so the caller still holds them for a retry.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no selector records to export")]
    Empty,

    #[error("page source unavailable: {0}")]
    Source(#[from] AccessError),
}
