//! Credit Card Fraud Detection - Model Core
//!
//! Shared by the offline trainer (`fraud-train`) and the prediction API.
//!
//! ```text
//!  creditcard.csv ──► dataset ──► split ──► undersample ──► scaler ──► forest
//!                                                              │          │
//!                                                              ▼          ▼
//!                                   config.json ◄── artifacts ── scaler.json, model.json
//!                                                      │
//!                                                      ▼
//!                                                  Predictor (API)
//! ```

pub mod constants;
pub mod logic;

// Re-export common types
pub use logic::artifacts::{load_artifacts, save_artifacts, ArtifactError, ModelConfig};
pub use logic::features::{FeatureError, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{
    DemoPredictions, DemoResult, InferenceError, PredictError, Prediction, Predictor,
};
pub use logic::training::{TrainConfig, TrainError, TrainReport, TrainedModel};
