//! Batch steps of the milk price model
//!
//! Two scheduled chains run these steps in order:
//!
//! - data: [`validate_assets`] → [`preprocess_assets`] → [`feature_engineering`]
//! - model: [`hypertune_model`] → [`training_model`]
//!
//! [`promote_model`] is triggered by hand once a staged model looks good.
//! Every step takes a [`StepContext`] and, in a dry run, computes everything
//! without writing any file.

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod context;
pub mod error;
pub mod features;
pub mod preprocessing;
pub mod promotion;
pub mod training;
pub mod validation;

pub use context::StepContext;
pub use error::{PipelineError, PipelineResult, RuleViolation};
pub use features::{FeatureSummary, feature_engineering, split_indices};
pub use preprocessing::{PreprocessSummary, preprocess_assets};
pub use promotion::{PromotionGate, PromotionOutcome, promote_model};
pub use training::{hypertune_model, training_model};
pub use validation::{Schema, validate_assets};
