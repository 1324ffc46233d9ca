//! Shared state handed to every step

use common::{ArtifactLayout, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration, file layout and dry-run flag for one step invocation
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Loaded pipeline configuration
    pub config: PipelineConfig,
    /// Resolved file locations
    pub layout: ArtifactLayout,
    /// Compute everything but persist nothing
    pub dry_run: bool,
}

impl StepContext {
    /// Context rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>, config: PipelineConfig, dry_run: bool) -> Self {
        let layout = ArtifactLayout::new(base_path, config.paths.clone());
        Self {
            config,
            layout,
            dry_run,
        }
    }

    /// Base path of the workspace
    #[must_use]
    pub fn base(&self) -> &Path {
        self.layout.base()
    }

    /// Log the step banner with the dry-run state
    pub fn banner(&self, step: &str) {
        info!("=======================================================");
        if self.dry_run {
            info!("Dry run activated - Running {step}");
        } else {
            info!("Dry run is not activated - Running {step}");
        }
        info!("=======================================================");
    }
}
