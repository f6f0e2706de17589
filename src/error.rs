use std::io;

use thiserror::Error;

/// Result type for the data layer.
pub type DataResult<T> = Result<T, DataError>;

/// A raw source that could not be turned into a record set.
///
/// Every variant is fatal for the load that produced it: no partial table is
/// returned. Missing columns and malformed cells are not errors, they are
/// absorbed by the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    // The source parsed, but not into rows and columns.
    #[error("Malformed source: {reason}")]
    Malformed { reason: String },
}

impl DataError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DataError::Malformed {
            reason: reason.into(),
        }
    }
}
