use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::ModelConfig;
use super::validate::{sha256_hex, validate_artifacts, verify_checksum};
use super::ArtifactError;
use crate::constants::{CONFIG_FILE, MODEL_FILE, SCALER_FILE};
use crate::logic::model::{Predictor, RandomForest, StandardScaler};

/// Locations of the three artifacts inside a model directory
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
    pub config: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            scaler: dir.join(SCALER_FILE),
            model: dir.join(MODEL_FILE),
            config: dir.join(CONFIG_FILE),
        }
    }
}

/// Save scaler, model and config to `dir`.
///
/// The config is written last and records the checksums of the other two.
pub fn save_artifacts(
    dir: &Path,
    scaler: &StandardScaler,
    forest: &RandomForest,
    mut config: ModelConfig,
) -> Result<ModelConfig, ArtifactError> {
    // Ensure directory exists
    fs::create_dir_all(dir).map_err(|e| ArtifactError::io(dir, e))?;

    let paths = ArtifactPaths::in_dir(dir);

    let scaler_bytes = write_json(&paths.scaler, scaler)?;
    config.scaler_sha256 = sha256_hex(&scaler_bytes);

    let model_bytes = write_json(&paths.model, forest)?;
    config.model_sha256 = sha256_hex(&model_bytes);

    write_json(&paths.config, &config)?;

    log::info!(
        "Artifacts saved to {} (model {}, {} bytes)",
        dir.display(),
        config.model_id,
        model_bytes.len()
    );

    Ok(config)
}

/// Load and cross-check all three artifacts from `dir`
pub fn load_artifacts(dir: &Path) -> Result<Predictor, ArtifactError> {
    let paths = ArtifactPaths::in_dir(dir);

    let config_bytes = read_file(&paths.config)?;
    let config: ModelConfig = parse_json(&paths.config, &config_bytes)?;

    let scaler_bytes = read_file(&paths.scaler)?;
    verify_checksum(SCALER_FILE, &scaler_bytes, &config.scaler_sha256)?;
    let scaler: StandardScaler = parse_json(&paths.scaler, &scaler_bytes)?;

    let model_bytes = read_file(&paths.model)?;
    verify_checksum(MODEL_FILE, &model_bytes, &config.model_sha256)?;
    let forest: RandomForest = parse_json(&paths.model, &model_bytes)?;

    validate_artifacts(&config, &scaler, &forest)?;

    log::info!(
        "Model {} loaded: {} features, {} trees",
        config.model_id,
        config.feature_count(),
        forest.n_trees()
    );

    Ok(Predictor::new(config, scaler, forest))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, ArtifactError> {
    let bytes = serde_json::to_vec(value).map_err(|e| ArtifactError::serialization(path, e))?;
    fs::write(path, &bytes).map_err(|e| ArtifactError::io(path, e))?;
    Ok(bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|e| ArtifactError::io(path, e))
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|e| ArtifactError::serialization(path, e))
}
