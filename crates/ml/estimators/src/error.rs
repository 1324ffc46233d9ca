//! Estimator error types

use frame::FrameError;
use thiserror::Error;

/// Errors raised while fitting, scoring or persisting estimators
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// `transform` or `predict` called before `fit`
    #[error("{0} used before fit")]
    NotFitted(&'static str),

    /// Row or column counts disagree
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Size the estimator expected
        expected: usize,
        /// Size it received
        actual: usize,
    },

    /// No rows to fit on
    #[error("empty input")]
    EmptyInput,

    /// Normal equations could not be solved
    #[error("system is not positive definite")]
    Singular,

    /// Hyperparameter out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Feature table could not be turned into a matrix
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Model could not be encoded or decoded
    #[error("model serialization failed: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result alias for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;
