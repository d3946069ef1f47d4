//! Unified error type for the benchmark and aggregation pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("value kind {got} does not match schema kind {expected}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    #[error("malformed rowbin buffer: {0}")]
    Format(String),

    #[error("dataset must contain at least one row")]
    EmptyDataset,

    #[error("decode materialized {got} rows, expected {expected}")]
    RowCountMismatch { expected: usize, got: usize },

    #[error("invalid benchmark key segment {0:?}: must be non-empty and free of path separators")]
    InvalidKey(String),

    #[error("size exponent {0} exceeds the supported maximum of 63")]
    SizeExponentTooLarge(u32),

    #[error("report leaf {0} has fewer than three ancestor segments")]
    MalformedReportPath(PathBuf),

    #[error("report leaf {path} has non-integer size segment {segment:?}")]
    MalformedSizeSegment { path: PathBuf, segment: String },

    #[error("corrupt report at {path}: {reason}")]
    CorruptReport { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
