//! Frame error types

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by table access and table I/O
#[derive(Debug, Error)]
pub enum FrameError {
    /// Requested column does not exist
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Column exists with the wrong type
    #[error("column {column} is not {expected}")]
    TypeMismatch {
        /// Offending column
        column: String,
        /// Kind of column the operation needed
        expected: &'static str,
    },

    /// A value was required but the cell is empty
    #[error("missing value in column {column} at row {row}")]
    MissingValue {
        /// Offending column
        column: String,
        /// Zero-based row
        row: usize,
    },

    /// Record batch could not be turned into a frame
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Polars failure
    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for frame operations
pub type FrameResult<T> = Result<T, FrameError>;
