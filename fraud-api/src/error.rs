//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fraud_core::PredictError;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

pub const MISSING_FEATURES: &str = "Missing 'features' array in request";

#[derive(Debug, Error)]
pub enum AppError {
    // Client sent something the model cannot take
    #[error("{0}")]
    Validation(String),

    // Artifacts failed to load at startup
    #[error("Model not loaded")]
    ModelUnavailable,

    // Scaler or forest failed on a well-formed vector
    #[error("{0}")]
    Inference(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::ModelUnavailable => "unavailable",
            AppError::Inference(_) => "inference",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Inference(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match &self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                msg.clone()
            }
            AppError::ModelUnavailable => {
                tracing::warn!("Request refused, model not loaded");
                self.to_string()
            }
            AppError::Inference(msg) => {
                tracing::error!("Inference error: {}", msg);
                msg.clone()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": self.kind(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Validation(e) => AppError::Validation(e.to_string()),
            PredictError::Inference(e) => AppError::Inference(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("JSON body rejected: {}", rejection.body_text());
        AppError::Validation(MISSING_FEATURES.to_string())
    }
}
