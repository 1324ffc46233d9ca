//! Request errors and their HTTP mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use frame::FrameError;
use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use transformers::TransformError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The batch is malformed or incomplete
    #[error("{0}")]
    BadRequest(String),
    /// The batch is valid but yields no row to predict on
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "no_usable_row", msg),
            Self::Internal(msg) => {
                error!("Prediction failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        let body = ErrorBody {
            error: error_type.into(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<FrameError> for ApiError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::InvalidRecord(_)
            | FrameError::ColumnNotFound(_)
            | FrameError::TypeMismatch { .. } => Self::BadRequest(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::NotNumeric(_) => Self::BadRequest(err.to_string()),
            TransformError::Frame(inner) => inner.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<PolarsError> for ApiError {
    fn from(err: PolarsError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}
