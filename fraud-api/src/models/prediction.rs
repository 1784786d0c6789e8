//! Prediction DTOs

use fraud_core::{DemoPredictions, DemoResult, Prediction};
use serde::{Deserialize, Serialize};

/// Body of `POST /predict`
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub fraud: bool,
    pub fraud_probability: f64,
    pub confidence: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            fraud: p.fraud,
            fraud_probability: p.fraud_probability,
            confidence: p.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DemoOutcome {
    pub fraud: bool,
    pub probability: f64,
}

impl From<DemoResult> for DemoOutcome {
    fn from(r: DemoResult) -> Self {
        Self {
            fraud: r.fraud,
            probability: r.probability,
        }
    }
}

/// Body of `GET /predict_demo`
#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub non_fraud: DemoOutcome,
    pub fraud: DemoOutcome,
}

impl From<DemoPredictions> for DemoResponse {
    fn from(d: DemoPredictions) -> Self {
        Self {
            non_fraud: d.non_fraud.into(),
            fraud: d.fraud.into(),
        }
    }
}
