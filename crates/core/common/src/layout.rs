//! Resolves every file the pipeline reads or writes under a base path

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::constants::{
    BEST_PARAMS_FILE, DATA_PIPELINE_FILE, HISTORY_DIR, HISTORY_TIMESTAMP_FORMAT, MERGED_FILE_NAME,
    PROD_METRICS_FILE, PROD_MODEL_FILE, STAGED_METRICS_FILE, STAGED_MODEL_FILE, TEST_FILE,
    TRAIN_FILE,
};
use crate::types::Source;

/// File locations for one pipeline workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    base: PathBuf,
    paths: PathsConfig,
}

impl ArtifactLayout {
    /// Layout rooted at `base`
    pub fn new(base: impl Into<PathBuf>, paths: PathsConfig) -> Self {
        Self {
            base: base.into(),
            paths,
        }
    }

    /// Base path every other location hangs off
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Declarative raw schema
    #[must_use]
    pub fn schema_file(&self) -> PathBuf {
        self.base.join(&self.paths.schema_file)
    }

    /// Raw table for a source
    #[must_use]
    pub fn raw_file(&self, source: Source) -> PathBuf {
        self.raw_dir().join(format!("{}.csv", source.file_stem()))
    }

    /// Raw tables directory
    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.base.join(&self.paths.raw_dir)
    }

    /// Intermediate tables directory
    #[must_use]
    pub fn interm_dir(&self) -> PathBuf {
        self.base.join(&self.paths.interm_dir)
    }

    /// Collected per-source table
    #[must_use]
    pub fn collected_file(&self, source: Source) -> PathBuf {
        self.interm_dir()
            .join(format!("collect_{}.csv", source.file_stem()))
    }

    /// Merged and shifted table
    #[must_use]
    pub fn merged_file(&self) -> PathBuf {
        self.interm_dir().join(format!("{MERGED_FILE_NAME}.csv"))
    }

    /// Feature tables directory
    #[must_use]
    pub fn feature_dir(&self) -> PathBuf {
        self.base.join(&self.paths.feature_dir)
    }

    /// Training split
    #[must_use]
    pub fn train_file(&self) -> PathBuf {
        self.feature_dir().join(TRAIN_FILE)
    }

    /// Test split
    #[must_use]
    pub fn test_file(&self) -> PathBuf {
        self.feature_dir().join(TEST_FILE)
    }

    /// Artifact directory
    #[must_use]
    pub fn artifact_dir(&self) -> PathBuf {
        self.base.join(&self.paths.artifact_dir)
    }

    /// Fitted feature pipeline
    #[must_use]
    pub fn data_pipeline_file(&self) -> PathBuf {
        self.artifact_dir().join(DATA_PIPELINE_FILE)
    }

    /// Best hyperparameters record
    #[must_use]
    pub fn best_params_file(&self) -> PathBuf {
        self.artifact_dir().join(BEST_PARAMS_FILE)
    }

    /// Staged model
    #[must_use]
    pub fn staged_model_file(&self) -> PathBuf {
        self.artifact_dir().join(STAGED_MODEL_FILE)
    }

    /// Staged metrics
    #[must_use]
    pub fn staged_metrics_file(&self) -> PathBuf {
        self.artifact_dir().join(STAGED_METRICS_FILE)
    }

    /// Production model
    #[must_use]
    pub fn production_model_file(&self) -> PathBuf {
        self.artifact_dir().join(PROD_MODEL_FILE)
    }

    /// Production metrics
    #[must_use]
    pub fn production_metrics_file(&self) -> PathBuf {
        self.artifact_dir().join(PROD_METRICS_FILE)
    }

    /// Root of the history archive
    #[must_use]
    pub fn history_root(&self) -> PathBuf {
        self.artifact_dir().join(HISTORY_DIR)
    }

    /// Snapshot directory for a given instant
    #[must_use]
    pub fn history_dir(&self, at: NaiveDateTime) -> PathBuf {
        self.history_root()
            .join(at.format(HISTORY_TIMESTAMP_FORMAT).to_string())
    }
}
