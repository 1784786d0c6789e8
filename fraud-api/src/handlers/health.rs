//! Service status and health check handlers

use axum::{extract::State, Json};

use crate::models::{HealthResponse, StatusResponse, SERVICE_MESSAGE};
use crate::AppState;

/// `GET /` - readiness plus the feature layout clients must send
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let response = match &state.model {
        Some(model) => StatusResponse {
            message: SERVICE_MESSAGE,
            status: "ready",
            features_required: model.expected_features(),
            features: model.feature_names().to_vec(),
        },
        None => StatusResponse {
            message: SERVICE_MESSAGE,
            status: "not_ready",
            features_required: 0,
            features: Vec::new(),
        },
    };

    Json(response)
}

/// `GET /health` - process is up; `model_loaded` tells whether it can predict
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model.is_some(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
