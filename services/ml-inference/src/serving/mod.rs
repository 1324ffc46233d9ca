//! HTTP routes

pub mod error;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use transformers::Transformer;

use crate::context::InferenceContext;
pub use error::ApiError;

/// Health check message
pub const HEALTH_MESSAGE: &str = "Hello world from service";

/// Rows shaped like the merged table, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Prediction for the most recent usable row
    pub prediction: f64,
}

/// Router over a shared context
pub fn router(context: Arc<InferenceContext>, max_body_size: usize) -> Router {
    Router::new()
        .route("/check_service", get(check_service))
        .route("/get_prediction", post(get_prediction))
        .with_state(context)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
}

async fn check_service() -> Json<Value> {
    Json(json!({ "Message": HEALTH_MESSAGE }))
}

async fn get_prediction(
    State(context): State<Arc<InferenceContext>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let prediction = predict_latest(&context, &request.data)?;
    Ok(Json(PredictionResponse { prediction }))
}

/// Validate the batch, run the feature pipeline and the model, and return the
/// prediction for the last complete row
pub fn predict_latest(context: &InferenceContext, records: &[Value]) -> Result<f64, ApiError> {
    let settings = &context.settings;
    if records.len() < settings.window_size {
        return Err(ApiError::BadRequest(format!(
            "at least {} rows are required, got {}",
            settings.window_size,
            records.len()
        )));
    }

    let batch = frame::from_records(records)?;
    let missing: Vec<&str> = settings
        .required_columns
        .iter()
        .filter(|c| !frame::has_column(&batch, c))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let features = context
        .pipeline
        .transform(&batch)?
        .drop_nulls::<String>(None)?;
    debug!(rows = batch.height(), usable = features.height(), "Transformed batch");
    if features.height() == 0 {
        return Err(ApiError::Unprocessable(
            "no row has every feature after the feature pipeline".into(),
        ));
    }

    let last = features.tail(Some(1));
    let predicted = context.model.predict(&last)?;
    let prediction = predicted
        .first()
        .copied()
        .ok_or_else(|| ApiError::Internal("model returned no prediction".into()))?;
    info!(prediction, rows = records.len(), "Served prediction");
    Ok(prediction)
}
