//! Transformer error types

use frame::FrameError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while building, fitting or applying transformers
#[derive(Debug, Error)]
pub enum TransformError {
    /// The step was configured with values it cannot run with
    #[error("invalid transformer configuration: {0}")]
    InvalidConfig(String),

    /// The requested operation is not implemented
    #[error("unimplemented operation: {0}")]
    Unsupported(String),

    /// A column the step computes on is not numeric
    #[error("column {0} must be numeric")]
    NotNumeric(String),

    /// Underlying frame failure
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Polars failure while rebuilding a frame
    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// Fitted pipeline could not be encoded or decoded
    #[error("pipeline serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result alias for transformer operations
pub type TransformResult<T> = Result<T, TransformError>;
