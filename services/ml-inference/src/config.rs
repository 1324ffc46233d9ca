//! Configuration for the prediction service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Pipeline base path holding the promoted artifacts
    pub base_path: PathBuf,
    /// Pipeline configuration file; defaults apply when absent
    pub pipeline_config: Option<PathBuf>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            base_path: PathBuf::from("."),
            pipeline_config: None,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl ServerConfig {
    /// Load configuration from file, with `MILK_SERVER__*` overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path))
            .add_source(::config::Environment::with_prefix("MILK_SERVER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Get server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = 9100\nbase_path = \"/srv/milk\"\n").unwrap();

        let config = ServerConfig::from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.base_path, PathBuf::from("/srv/milk"));
        assert_eq!(config.server_address(), "0.0.0.0:9100");
    }
}
