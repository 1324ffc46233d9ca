//! Feature transformers for the milk price pipeline
//!
//! Every step implements the one [`Transformer`] contract. Steps are plain
//! serde types so a fitted [`FeaturePipeline`] can be written once by the
//! feature engineering step and read back unchanged by the inference service.

#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod pipeline;
pub mod rolling;
pub mod selector;

pub use error::{TransformError, TransformResult};
pub use format::{FormatFixer, FormatKind};
pub use pipeline::{FeaturePipeline, PipelineStep};
pub use rolling::{RollingAggregator, RollingStat};
pub use selector::ColumnSelector;

use polars::prelude::DataFrame;

/// A fit/transform step over a [`DataFrame`]
///
/// `fit` may be a no-op and never mutates the input; `transform` always
/// returns a new frame.
pub trait Transformer {
    /// Learn whatever state the step needs from training data
    fn fit(&mut self, frame: &DataFrame, target: Option<&[Option<f64>]>) -> TransformResult<()>;

    /// Apply the step
    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame>;

    /// `fit` then `transform` on the same frame
    fn fit_transform(
        &mut self,
        frame: &DataFrame,
        target: Option<&[Option<f64>]>,
    ) -> TransformResult<DataFrame> {
        self.fit(frame, target)?;
        self.transform(frame)
    }
}
