//! Prediction service for the promoted milk price model
//!
//! Provides:
//! - `GET /check_service` health check
//! - `POST /get_prediction` over a batch of merged-table rows
//!
//! The model and the fitted feature pipeline are loaded once into an
//! immutable [`InferenceContext`] shared by every request.

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod models;
pub mod serving;

pub use crate::config::ServerConfig;
pub use crate::context::{InferenceContext, InferenceSettings};
pub use models::{LinearModel, ModelMetadata, ModelType, PriceModel};
pub use serving::{ApiError, PredictionRequest, PredictionResponse, predict_latest, router};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Bind and serve until the process stops
pub async fn start_server(config: ServerConfig, context: InferenceContext) -> Result<()> {
    let app = router(Arc::new(context), config.max_body_size);
    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Prediction service listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
