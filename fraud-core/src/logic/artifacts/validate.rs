use sha2::{Digest, Sha256};

use super::types::ModelConfig;
use super::ArtifactError;
use crate::logic::features::compute_layout_hash;
use crate::logic::model::{RandomForest, StandardScaler};

/// Hex SHA-256 of an artifact's bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare file bytes against the checksum recorded in config.json
pub fn verify_checksum(file: &str, bytes: &[u8], expected: &str) -> Result<(), ArtifactError> {
    let actual = sha256_hex(bytes);
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(ArtifactError::ChecksumMismatch {
            file: file.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Validate that the three artifacts describe the same model
pub fn validate_artifacts(
    config: &ModelConfig,
    scaler: &StandardScaler,
    forest: &RandomForest,
) -> Result<(), ArtifactError> {
    if config.feature_cols.is_empty() {
        return Err(ArtifactError::Invalid("config lists no features".to_string()));
    }

    let actual_hash = compute_layout_hash(&config.feature_cols);
    if actual_hash != config.layout_hash {
        return Err(ArtifactError::LayoutMismatch {
            expected: config.layout_hash,
            actual: actual_hash,
        });
    }

    let expected = config.feature_count();
    if let Some(actual) = [scaler.mean.len(), scaler.scale.len()]
        .into_iter()
        .find(|&len| len != expected)
    {
        return Err(ArtifactError::ShapeMismatch {
            artifact: "scaler",
            expected,
            actual,
        });
    }
    if scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
        return Err(ArtifactError::Invalid("scaler has a zero or non-finite scale".to_string()));
    }

    if forest.n_features != expected {
        return Err(ArtifactError::ShapeMismatch {
            artifact: "model",
            expected,
            actual: forest.n_features,
        });
    }
    forest.validate()?;

    Ok(())
}
