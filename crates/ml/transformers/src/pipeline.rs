//! Ordered, named composition of transformer steps

use common::PipelineConfig;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::{
    ColumnSelector, FormatFixer, FormatKind, RollingAggregator, TransformResult, Transformer,
};

/// One serializable pipeline step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStep {
    /// Number format repair
    FixFormat(FormatFixer),
    /// Trailing window statistic
    Rolling(RollingAggregator),
    /// Final column subset
    Select(ColumnSelector),
}

impl PipelineStep {
    /// Columns this step reads
    fn inputs(&self) -> &[String] {
        match self {
            Self::FixFormat(step) => step.columns(),
            Self::Rolling(step) => step.columns(),
            Self::Select(step) => step.columns(),
        }
    }

    /// Columns this step adds
    fn outputs(&self) -> Vec<String> {
        match self {
            Self::Rolling(step) => step.columns().iter().map(|c| step.output_name(c)).collect(),
            Self::FixFormat(_) | Self::Select(_) => Vec::new(),
        }
    }
}

impl Transformer for PipelineStep {
    fn fit(&mut self, frame: &DataFrame, target: Option<&[Option<f64>]>) -> TransformResult<()> {
        match self {
            Self::FixFormat(step) => step.fit(frame, target),
            Self::Rolling(step) => step.fit(frame, target),
            Self::Select(step) => step.fit(frame, target),
        }
    }

    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame> {
        match self {
            Self::FixFormat(step) => step.transform(frame),
            Self::Rolling(step) => step.transform(frame),
            Self::Select(step) => step.transform(frame),
        }
    }
}

/// Feature pipeline fitted on training data and reused unchanged at inference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePipeline {
    steps: Vec<(String, PipelineStep)>,
}

impl FeaturePipeline {
    /// Empty pipeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named step
    #[must_use]
    pub fn with_step(mut self, name: impl Into<String>, step: PipelineStep) -> Self {
        self.steps.push((name.into(), step));
        self
    }

    /// The standard composition: fix PIB and index formats, rolling
    /// statistics over milk price, regions, PIB and index, then the final
    /// feature list.
    pub fn default_from(config: &PipelineConfig) -> TransformResult<Self> {
        let columns = &config.columns;
        let mut pipeline = Self::new()
            .with_step(
                "fix_pib",
                PipelineStep::FixFormat(FormatFixer::new(
                    columns.pib.iter().cloned(),
                    FormatKind::ThousandsInteger,
                )),
            )
            .with_step(
                "fix_index",
                PipelineStep::FixFormat(FormatFixer::new(
                    columns.index.iter().cloned(),
                    FormatKind::IndexDecimal,
                )),
            );

        let rolling_columns = columns.rolling_columns();
        for stat in &config.rolling.statistics {
            pipeline = pipeline.with_step(
                format!("rolling_{stat}"),
                PipelineStep::Rolling(RollingAggregator::new(
                    rolling_columns.iter().cloned(),
                    stat.as_str(),
                    config.rolling.window_size,
                )?),
            );
        }

        Ok(pipeline.with_step(
            "take_variables",
            PipelineStep::Select(ColumnSelector::new(columns.features.iter().cloned())?),
        ))
    }

    /// Steps in execution order
    #[must_use]
    pub fn steps(&self) -> &[(String, PipelineStep)] {
        &self.steps
    }

    /// Raw input columns: everything a step reads that no earlier step adds
    #[must_use]
    pub fn required_columns(&self) -> Vec<String> {
        let mut produced = HashSet::new();
        let mut seen = HashSet::new();
        let mut required = Vec::new();
        for (_, step) in &self.steps {
            for column in step.inputs() {
                if !produced.contains(column) && seen.insert(column.clone()) {
                    required.push(column.clone());
                }
            }
            produced.extend(step.outputs());
        }
        required
    }

    /// Widest trailing window of any rolling step: the fewest rows a batch
    /// needs before its latest row carries every statistic
    #[must_use]
    pub fn window_size(&self) -> Option<usize> {
        self.steps
            .iter()
            .filter_map(|(_, step)| match step {
                PipelineStep::Rolling(rolling) => Some(rolling.window_size()),
                PipelineStep::FixFormat(_) | PipelineStep::Select(_) => None,
            })
            .max()
    }

    /// Columns of the final output when the last step is a selector
    #[must_use]
    pub fn output_columns(&self) -> Option<&[String]> {
        match self.steps.last() {
            Some((_, PipelineStep::Select(selector))) => Some(selector.columns()),
            _ => None,
        }
    }

    /// Encode the fitted pipeline
    pub fn to_bytes(&self) -> TransformResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a fitted pipeline
    pub fn from_bytes(bytes: &[u8]) -> TransformResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Transformer for FeaturePipeline {
    fn fit(&mut self, frame: &DataFrame, target: Option<&[Option<f64>]>) -> TransformResult<()> {
        let mut current = frame.clone();
        for (name, step) in &mut self.steps {
            current = step.fit_transform(&current, target)?;
            debug!(step = %name, columns = current.width(), "Fitted pipeline step");
        }
        info!(steps = self.steps.len(), rows = frame.height(), "Feature pipeline fitted");
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> TransformResult<DataFrame> {
        let mut current = frame.clone();
        for (_, step) in &self.steps {
            current = step.transform(&current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_composition() {
        let pipeline = FeaturePipeline::default_from(&PipelineConfig::default()).unwrap();
        let names: Vec<&str> = pipeline.steps().iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(
            names,
            vec!["fix_pib", "fix_index", "rolling_mean", "rolling_std", "take_variables"]
        );
        assert_eq!(pipeline.output_columns().map(<[String]>::len), Some(14));
    }

    #[test]
    fn test_required_columns_exclude_derived() {
        let pipeline = FeaturePipeline::default_from(&PipelineConfig::default()).unwrap();
        let required = pipeline.required_columns();

        assert_eq!(required.len(), 4 + 5 + 1 + 8);
        assert!(required.iter().any(|c| c == "Precio_leche"));
        assert!(required.iter().all(|c| !c.contains("_rolling")));
    }

    #[test]
    fn test_window_size_comes_from_rolling_steps() {
        let mut config = PipelineConfig::default();
        config.rolling.window_size = 5;
        let pipeline = FeaturePipeline::default_from(&config).unwrap();

        assert_eq!(pipeline.window_size(), Some(5));
        assert_eq!(FeaturePipeline::new().window_size(), None);
    }

    #[test]
    fn test_bytes_round_trip() {
        let pipeline = FeaturePipeline::default_from(&PipelineConfig::default()).unwrap();
        let decoded = FeaturePipeline::from_bytes(&pipeline.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, pipeline);
    }
}
