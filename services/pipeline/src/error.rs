//! Error types for the batch steps

use common::ConfigError;
use estimators::EstimatorError;
use frame::FrameError;
use polars::prelude::PolarsError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use transformers::TransformError;

/// One failed schema rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Raw table (file stem)
    pub source: String,
    /// Column the rule applies to
    pub column: String,
    /// Zero-based data row, when the rule is per cell
    pub row: Option<usize>,
    /// Rule name (`required`, `nullable`, `type`, `min`, `max`, `allowed`, `regex`)
    pub rule: String,
    /// Human-readable detail
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(
                f,
                "{}.{} row {}: {} ({})",
                self.source, self.column, row, self.message, self.rule
            ),
            None => write!(f, "{}.{}: {} ({})", self.source, self.column, self.message, self.rule),
        }
    }
}

fn join_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by pipeline steps
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raw data broke one or more schema rules
    #[error("validation failed with {} violation(s): {}", .0.len(), join_violations(.0))]
    Validation(Vec<RuleViolation>),

    /// Schema file could not be understood
    #[error("invalid schema: {0}")]
    Schema(String),

    /// An input file a step depends on does not exist
    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),

    /// The staged model did not pass the promotion gate
    #[error("promotion rejected: {0}")]
    PromotionRejected(String),

    /// A history snapshot for this timestamp was already written
    #[error("snapshot already exists: {}", .0.display())]
    SnapshotExists(PathBuf),

    /// A step produced no usable rows
    #[error("no rows left after {0}")]
    EmptyData(String),

    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Table operation failure
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Table engine failure
    #[error("table error: {0}")]
    Polars(#[from] PolarsError),

    /// Feature pipeline failure
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Model failure
    #[error(transparent)]
    Estimator(#[from] EstimatorError),

    /// JSON record failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for pipeline steps
pub type PipelineResult<T> = Result<T, PipelineError>;
