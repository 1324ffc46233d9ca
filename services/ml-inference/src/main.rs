//! Milk price prediction service - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use common::{PipelineConfig, init_tracing};
use ml_inference::{InferenceContext, ServerConfig, start_server};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "ml-inference")]
#[command(about = "Serve predictions from the promoted milk price model", version)]
struct Cli {
    /// Server configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,
    /// Override the bind host
    #[arg(long)]
    host: Option<String>,
    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
    /// Override the pipeline base path
    #[arg(long)]
    base_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("ml_inference=info,tower_http=debug");

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading server configuration from {path}"))?,
        None => {
            warn!("No configuration file given, using defaults");
            ServerConfig::default()
        }
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(base_path) = cli.base_path {
        config.base_path = base_path;
    }

    let pipeline_config = PipelineConfig::load(config.pipeline_config.as_deref())
        .context("loading pipeline configuration")?;
    let context = InferenceContext::load(&config.base_path, &pipeline_config)?;

    info!(
        "Starting prediction service v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_address()
    );
    start_server(config, context).await
}
