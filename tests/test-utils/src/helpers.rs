//! Test helper functions and utilities

use common::{PipelineConfig, TuningConfig};
use tracing_subscriber::EnvFilter;

/// Initialize test logging with environment-based configuration.
///
/// Safe to call multiple times - subsequent calls are ignored.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration with a grid small enough for integration tests
#[must_use]
pub fn small_config() -> PipelineConfig {
    PipelineConfig {
        tuning: TuningConfig {
            selector_k: vec![3, 5],
            poly_degree: vec![1, 2],
            ridge_alpha: vec![1.0, 0.1],
            ..TuningConfig::default()
        },
        ..PipelineConfig::default()
    }
}
