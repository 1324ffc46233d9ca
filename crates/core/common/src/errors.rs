//! Error types for configuration loading

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or environment could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Values were read but cannot be used
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
