//! Models the service can serve

use anyhow::{Context, Result};
use estimators::ModelPipeline;
use ndarray::Array1;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Base trait for every servable model
pub trait PriceModel: Send + Sync {
    /// Feature columns the model reads, in order
    fn feature_names(&self) -> &[String];

    /// One prediction per row of a feature table
    fn predict(&self, features: &DataFrame) -> Result<Array1<f64>>;

    /// Get model metadata
    fn metadata(&self) -> ModelMetadata;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub model_type: ModelType,
    pub input_features: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Plain weights and bias
    Linear,
    /// Scaler, k-best selector, polynomial expansion and ridge
    RidgePipeline,
}

impl PriceModel for ModelPipeline {
    fn feature_names(&self) -> &[String] {
        ModelPipeline::feature_names(self)
    }

    fn predict(&self, features: &DataFrame) -> Result<Array1<f64>> {
        self.predict_frame(features)
            .context("model pipeline prediction failed")
    }

    fn metadata(&self) -> ModelMetadata {
        let params = self.params();
        ModelMetadata {
            name: format!(
                "ridge(k={}, degree={}, alpha={})",
                params.selector_k, params.poly_degree, params.ridge_alpha
            ),
            model_type: ModelType::RidgePipeline,
            input_features: self.feature_names().to_vec(),
        }
    }
}

/// Linear model with fixed weights over named features
pub struct LinearModel {
    feature_names: Vec<String>,
    weights: Array1<f64>,
    bias: f64,
}

impl LinearModel {
    /// Initialize with known weights, one per feature
    pub fn from_weights(feature_names: Vec<String>, weights: Array1<f64>, bias: f64) -> Result<Self> {
        if feature_names.len() != weights.len() {
            anyhow::bail!(
                "{} feature names for {} weights",
                feature_names.len(),
                weights.len()
            );
        }
        Ok(Self {
            feature_names,
            weights,
            bias,
        })
    }
}

impl PriceModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &DataFrame) -> Result<Array1<f64>> {
        let x = frame::to_matrix(features, &self.feature_names)?;
        Ok(x.dot(&self.weights) + self.bias)
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: "LinearRegression".to_string(),
            model_type: ModelType::Linear,
            input_features: self.feature_names.clone(),
        }
    }
}
