use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::APP_VERSION;
use crate::logic::features::compute_layout_hash;
use crate::logic::model::ForestParams;

// ============================================================================
// MODEL CONFIG (config.json)
// ============================================================================

/// Metadata binding a stored model to the shape of its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Ordered feature names; request vectors follow this order
    pub feature_cols: Vec<String>,
    /// CRC32 of `feature_cols`
    pub layout_hash: u32,

    pub model_id: String,
    pub trained_at: DateTime<Utc>,
    pub trainer_version: String,
    pub forest: ForestParams,

    /// SHA-256 of scaler.json, filled in when saved
    #[serde(default)]
    pub scaler_sha256: String,
    /// SHA-256 of model.json, filled in when saved
    #[serde(default)]
    pub model_sha256: String,
}

impl ModelConfig {
    pub fn new(feature_cols: Vec<String>, forest: ForestParams) -> Self {
        Self {
            layout_hash: compute_layout_hash(&feature_cols),
            feature_cols,
            model_id: uuid::Uuid::new_v4().to_string(),
            trained_at: Utc::now(),
            trainer_version: APP_VERSION.to_string(),
            forest,
            scaler_sha256: String::new(),
            model_sha256: String::new(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.feature_cols.len()
    }
}
