//! Immutable state shared by every request

use anyhow::{Context, Result};
use common::{ArtifactLayout, PipelineConfig};
use estimators::ModelPipeline;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use transformers::FeaturePipeline;

use crate::models::PriceModel;

/// Request validation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceSettings {
    /// Minimum rows per batch, the rolling window size
    pub window_size: usize,
    /// Columns every batch must carry
    pub required_columns: Vec<String>,
}

/// Model and feature pipeline loaded once at startup
pub struct InferenceContext {
    pub model: Arc<dyn PriceModel>,
    pub pipeline: FeaturePipeline,
    pub settings: InferenceSettings,
}

impl InferenceContext {
    /// Assemble a context; the minimum batch size and the required columns
    /// come from the fitted pipeline
    pub fn new(model: Arc<dyn PriceModel>, pipeline: FeaturePipeline) -> Self {
        let settings = InferenceSettings {
            window_size: pipeline.window_size().unwrap_or(1),
            required_columns: pipeline.required_columns(),
        };
        Self {
            model,
            pipeline,
            settings,
        }
    }

    /// Load the production model and the fitted feature pipeline
    pub fn load(base_path: &Path, config: &PipelineConfig) -> Result<Self> {
        let layout = ArtifactLayout::new(base_path, config.paths.clone());

        let model_path = layout.production_model_file();
        let model_bytes = fs::read(&model_path)
            .with_context(|| format!("reading production model {}", model_path.display()))?;
        let model = ModelPipeline::from_bytes(&model_bytes).context("decoding production model")?;

        let pipeline_path = layout.data_pipeline_file();
        let pipeline_bytes = fs::read(&pipeline_path)
            .with_context(|| format!("reading feature pipeline {}", pipeline_path.display()))?;
        let pipeline = FeaturePipeline::from_bytes(&pipeline_bytes).context("decoding feature pipeline")?;

        if let Some(outputs) = pipeline.output_columns() {
            let unknown: Vec<&str> = model
                .feature_names()
                .iter()
                .filter(|name| !outputs.contains(name))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                anyhow::bail!(
                    "model reads columns the feature pipeline does not produce: {}",
                    unknown.join(", ")
                );
            }
        }

        let context = Self::new(Arc::new(model), pipeline);
        let metadata = context.model.metadata();
        info!(
            model = %metadata.name,
            features = metadata.input_features.len(),
            window_size = context.settings.window_size,
            required_columns = context.settings.required_columns.len(),
            "Loaded inference context"
        );
        Ok(context)
    }
}
