//! Pipeline configuration
//!
//! Every section has a `Default` carrying the values the pipeline was built
//! around, so a config file only needs the keys it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{CITY_COLS, IMACEC_INDICE_COLS, MILK_PRICE_COL, PIB_COLS, TAKE_VARS, TARGET_COL};
use crate::errors::ConfigError;

/// Environment variable prefix for overrides, e.g. `MILK__SPLIT__SEED=7`
pub const ENV_PREFIX: &str = "MILK";

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory layout relative to the base path
    pub paths: PathsConfig,
    /// Column groups
    pub columns: ColumnsConfig,
    /// Rolling feature settings
    pub rolling: RollingConfig,
    /// Train/test split settings
    pub split: SplitConfig,
    /// Hyperparameter search settings
    pub tuning: TuningConfig,
    /// Promotion gate settings
    pub promotion: PromotionConfig,
}

/// Directory layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw input tables
    pub raw_dir: String,
    /// Per-source and merged intermediate tables
    pub interm_dir: String,
    /// Train/test feature tables
    pub feature_dir: String,
    /// Fitted pipelines, parameters, metrics and models
    pub artifact_dir: String,
    /// Declarative raw schema
    pub schema_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: "data/raw".to_string(),
            interm_dir: "data/interm".to_string(),
            feature_dir: "data/features".to_string(),
            artifact_dir: "artifacts".to_string(),
            schema_file: "model/schema.toml".to_string(),
        }
    }
}

/// Column groups driving the feature pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Regression target
    pub target: String,
    /// Milk price predictor
    pub milk_price: String,
    /// Precipitation regions
    pub regions: Vec<String>,
    /// Thousands-separated integer columns
    pub pib: Vec<String>,
    /// Index columns with misplaced decimal separators
    pub index: Vec<String>,
    /// Final ordered feature list
    pub features: Vec<String>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            target: TARGET_COL.to_string(),
            milk_price: MILK_PRICE_COL.to_string(),
            regions: CITY_COLS.iter().map(ToString::to_string).collect(),
            pib: PIB_COLS.iter().map(ToString::to_string).collect(),
            index: IMACEC_INDICE_COLS.iter().map(ToString::to_string).collect(),
            features: TAKE_VARS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ColumnsConfig {
    /// Columns that receive rolling statistics: milk price, regions, PIB, index
    #[must_use]
    pub fn rolling_columns(&self) -> Vec<String> {
        std::iter::once(self.milk_price.clone())
            .chain(self.regions.iter().cloned())
            .chain(self.pib.iter().cloned())
            .chain(self.index.iter().cloned())
            .collect()
    }
}

/// Rolling window settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingConfig {
    /// Trailing window size
    pub window_size: usize,
    /// Statistics appended, in order
    pub statistics: Vec<String>,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            statistics: vec!["mean".to_string(), "std".to_string()],
        }
    }
}

/// Train/test split settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of rows held out for testing
    pub test_fraction: f64,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Grid search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Number of cross-validation folds
    pub cv_folds: usize,
    /// Candidate `k` for the k-best selector
    pub selector_k: Vec<usize>,
    /// Candidate polynomial degrees
    pub poly_degree: Vec<usize>,
    /// Candidate ridge regularization strengths
    pub ridge_alpha: Vec<f64>,
    /// Neighbours used by the mutual information estimator
    pub mi_neighbors: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            cv_folds: 3,
            selector_k: vec![3, 4, 5, 6, 7, 10],
            poly_degree: vec![1, 2, 3],
            ridge_alpha: vec![1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01],
            mi_neighbors: 3,
        }
    }
}

/// Promotion gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    /// Allowed relative RMSE regression against production
    pub rmse_tolerance: f64,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            rmse_tolerance: 0.05,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a file with environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let cfg = Self::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Reject settings no step can run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.split.test_fraction > 0.0 && self.split.test_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "split.test_fraction must be in (0, 1), got {}",
                self.split.test_fraction
            )));
        }
        if self.rolling.window_size == 0 {
            return Err(ConfigError::Invalid("rolling.window_size must be positive".into()));
        }
        if self.tuning.cv_folds < 2 {
            return Err(ConfigError::Invalid(format!(
                "tuning.cv_folds must be at least 2, got {}",
                self.tuning.cv_folds
            )));
        }
        if self.tuning.selector_k.is_empty()
            || self.tuning.poly_degree.is_empty()
            || self.tuning.ridge_alpha.is_empty()
        {
            return Err(ConfigError::Invalid("tuning grid has an empty axis".into()));
        }
        if self.columns.features.is_empty() {
            return Err(ConfigError::Invalid("columns.features must not be empty".into()));
        }
        if self.promotion.rmse_tolerance < 0.0 {
            return Err(ConfigError::Invalid("promotion.rmse_tolerance must not be negative".into()));
        }
        Ok(())
    }
}
