//! Model Module - scaler, classifier, evaluation, inference
//!
//! Training-time code (`fit`) and serving-time code (`Predictor`) share
//! the same types so a model behaves identically in both places.

pub mod forest;
pub mod inference;
pub mod metrics;
pub mod scaler;

use thiserror::Error;

// Re-export common types
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use inference::{DemoPredictions, DemoResult, PredictError, Prediction, Predictor};
pub use metrics::{roc_auc, ClassificationReport, ConfusionCounts};
pub use scaler::StandardScaler;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Failures while running a loaded model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("{stage} expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Scaled feature at index {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("Model is corrupt: {0}")]
    CorruptModel(String),
}

/// Failures while fitting the scaler or classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Feature matrix has {rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
