//! Prediction handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::models::{DemoResponse, PredictRequest, PredictResponse};
use crate::{AppError, AppResult, AppState};

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    let model = state.model()?;

    let prediction = model.predict(req.features)?;

    tracing::debug!(
        "Prediction: fraud={} p={:.4}",
        prediction.fraud,
        prediction.fraud_probability
    );

    Ok(Json(prediction.into()))
}

/// `GET /predict_demo` - one obviously legit and one obviously fraudulent vector
pub async fn predict_demo(State(state): State<AppState>) -> AppResult<Json<DemoResponse>> {
    let model = state.model()?;
    let demo = model.predict_demo().map_err(AppError::from)?;
    Ok(Json(demo.into()))
}
