//! Feature Vector - Validated model input
//!
//! A request carries a bare `Vec<f64>`; it only becomes a `FeatureVector`
//! once its length matches the persisted feature list and every value is
//! finite.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEMO_FRAUD_AMOUNT;

// ============================================================================
// ERRORS
// ============================================================================

/// Client-side problems with an incoming vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Expected {expected} features, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Feature at index {index} is not a finite number")]
    NonFinite { index: usize },
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values in the order of the model's feature list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Validate raw values against the expected feature count
    pub fn validate(values: Vec<f64>, expected: usize) -> Result<Self, FeatureError> {
        if values.len() != expected {
            return Err(FeatureError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }

        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(FeatureError::NonFinite { index });
        }

        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

// ============================================================================
// DEMO VECTORS
// ============================================================================

/// Hardcoded smoke-test inputs for `/predict_demo`
#[derive(Debug, Clone)]
pub struct DemoVectors {
    /// All zeros
    pub non_fraud: Vec<f64>,
    /// All zeros except the last value (Amount)
    pub fraud: Vec<f64>,
}

/// Build the demo vectors for a model expecting `n` features
///
/// The "fraud" sample is not guaranteed to score as fraud.
pub fn demo_vectors(n: usize) -> DemoVectors {
    let non_fraud = vec![0.0; n];

    let mut fraud = vec![0.0; n];
    if let Some(last) = fraud.last_mut() {
        *last = DEMO_FRAUD_AMOUNT;
    }

    DemoVectors { non_fraud, fraud }
}
