//! Inference Engine - validate, scale, classify
//!
//! A `Predictor` owns the three loaded artifacts and is never mutated after
//! construction, so one instance can be shared across threads behind an
//! `Arc` without locking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{InferenceError, RandomForest, StandardScaler};
use crate::logic::artifacts::ModelConfig;
use crate::logic::features::{demo_vectors, FeatureError, FeatureVector};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub fraud: bool,
    /// P(fraud), 0.0 - 1.0
    pub fraud_probability: f64,
    /// max(P(fraud), P(legitimate)), always >= 0.5
    pub confidence: f64,
}

/// One entry of the demo response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemoResult {
    pub fraud: bool,
    pub probability: f64,
}

impl From<Prediction> for DemoResult {
    fn from(p: Prediction) -> Self {
        Self {
            fraud: p.fraud,
            probability: p.fraud_probability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemoPredictions {
    pub non_fraud: DemoResult,
    pub fraud: DemoResult,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Distinguishes bad input from a failing model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] FeatureError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ============================================================================
// PREDICTOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct Predictor {
    config: ModelConfig,
    scaler: StandardScaler,
    forest: RandomForest,
}

impl Predictor {
    /// Assemble from already validated parts
    pub fn new(config: ModelConfig, scaler: StandardScaler, forest: RandomForest) -> Self {
        Self { config, scaler, forest }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn feature_names(&self) -> &[String] {
        &self.config.feature_cols
    }

    pub fn expected_features(&self) -> usize {
        self.config.feature_cols.len()
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    /// Validate the raw vector, then run it through the model.
    ///
    /// A length mismatch is reported before the scaler or forest is touched.
    pub fn predict(&self, values: Vec<f64>) -> Result<Prediction, PredictError> {
        let vector = FeatureVector::validate(values, self.expected_features())?;
        Ok(self.predict_vector(&vector)?)
    }

    /// Scale and classify an already validated vector
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        let scaled = self.scaler.transform_row(vector.as_slice())?;
        let [legit, fraud] = self.forest.predict_proba(&scaled)?;

        Ok(Prediction {
            fraud: fraud > legit,
            fraud_probability: fraud,
            confidence: legit.max(fraud),
        })
    }

    /// Run the two hardcoded demo vectors through the normal path
    pub fn predict_demo(&self) -> Result<DemoPredictions, PredictError> {
        let demo = demo_vectors(self.expected_features());

        Ok(DemoPredictions {
            non_fraud: self.predict(demo.non_fraud)?.into(),
            fraud: self.predict(demo.fraud)?.into(),
        })
    }
}
