use super::storage::{load_artifacts, save_artifacts, ArtifactPaths};
use super::types::ModelConfig;
use super::validate::validate_artifacts;
use super::ArtifactError;
use crate::logic::model::{ForestParams, RandomForest, StandardScaler};
use ndarray::Array2;
use std::fs;
use tempfile::tempdir;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("f{}", i)).collect()
}

fn fitted(n_features: usize) -> (StandardScaler, RandomForest, ModelConfig) {
    let x = Array2::from_shape_fn((20, n_features), |(i, j)| (i * (j + 1)) as f64);
    let y: Vec<u8> = (0..20).map(|i| if i >= 10 { 1 } else { 0 }).collect();

    let (scaler, scaled) = StandardScaler::fit_transform(&x).unwrap();
    let params = ForestParams { n_estimators: 4, ..Default::default() };
    let forest = RandomForest::fit(&scaled, &y, &params).unwrap();
    let config = ModelConfig::new(names(n_features), params);

    (scaler, forest, config)
}

#[test]
fn test_save_load_cycle() {
    let dir = tempdir().unwrap();
    let (scaler, forest, config) = fitted(3);

    let saved = save_artifacts(dir.path(), &scaler, &forest, config.clone()).unwrap();
    assert_eq!(saved.scaler_sha256.len(), 64);
    assert_eq!(saved.model_sha256.len(), 64);
    assert_eq!(saved.model_id, config.model_id);

    let predictor = load_artifacts(dir.path()).unwrap();
    assert_eq!(predictor.config(), &saved);
    assert_eq!(predictor.expected_features(), 3);
    assert_eq!(predictor.n_trees(), 4);

    let paths = ArtifactPaths::in_dir(dir.path());
    assert!(paths.scaler.exists());
    assert!(paths.model.exists());
    assert!(paths.config.exists());
}

#[test]
fn test_save_creates_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("models").join("v1");
    let (scaler, forest, config) = fitted(2);

    save_artifacts(&nested, &scaler, &forest, config).unwrap();
    assert!(load_artifacts(&nested).is_ok());
}

#[test]
fn test_missing_directory_is_not_found() {
    let dir = tempdir().unwrap();
    let err = load_artifacts(&dir.path().join("absent")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_missing_single_artifact() {
    let dir = tempdir().unwrap();
    let (scaler, forest, config) = fitted(2);
    save_artifacts(dir.path(), &scaler, &forest, config).unwrap();

    fs::remove_file(ArtifactPaths::in_dir(dir.path()).model).unwrap();

    let err = load_artifacts(dir.path()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_reject_tampered_model() {
    let dir = tempdir().unwrap();
    let (scaler, forest, config) = fitted(2);
    save_artifacts(dir.path(), &scaler, &forest, config).unwrap();

    let path = ArtifactPaths::in_dir(dir.path()).model;
    let mut bytes = fs::read(&path).unwrap();
    bytes.push(b' ');
    fs::write(&path, bytes).unwrap();

    match load_artifacts(dir.path()) {
        Err(ArtifactError::ChecksumMismatch { file, .. }) => assert_eq!(file, "model.json"),
        other => panic!("Expected ChecksumMismatch, got {other:?}"),
    }
}

#[test]
fn test_reject_corrupt_config() {
    let dir = tempdir().unwrap();
    let (scaler, forest, config) = fitted(2);
    save_artifacts(dir.path(), &scaler, &forest, config).unwrap();

    fs::write(ArtifactPaths::in_dir(dir.path()).config, b"{not json").unwrap();

    let err = load_artifacts(dir.path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Serialization { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn test_reject_layout_hash_mismatch() {
    let (scaler, forest, mut config) = fitted(2);
    config.layout_hash = !config.layout_hash;

    let err = validate_artifacts(&config, &scaler, &forest).unwrap_err();
    assert!(matches!(err, ArtifactError::LayoutMismatch { .. }));
}

#[test]
fn test_reject_feature_count_mismatch() {
    let (scaler, forest, _) = fitted(2);
    let config = ModelConfig::new(names(3), ForestParams::default());

    let err = validate_artifacts(&config, &scaler, &forest).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::ShapeMismatch { artifact: "scaler", expected: 3, actual: 2 }
    ));
}

#[test]
fn test_reject_scale_length_mismatch() {
    let (mut scaler, forest, config) = fitted(2);
    scaler.scale.push(1.0);

    let err = validate_artifacts(&config, &scaler, &forest).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::ShapeMismatch { artifact: "scaler", expected: 2, actual: 3 }
    ));
}

#[test]
fn test_reject_empty_feature_list() {
    let (scaler, forest, _) = fitted(2);
    let config = ModelConfig::new(Vec::new(), ForestParams::default());
    assert!(matches!(
        validate_artifacts(&config, &scaler, &forest),
        Err(ArtifactError::Invalid(_))
    ));
}

#[test]
fn test_config_json_lists_feature_cols() {
    let dir = tempdir().unwrap();
    let (scaler, forest, config) = fitted(2);
    save_artifacts(dir.path(), &scaler, &forest, config).unwrap();

    let raw = fs::read_to_string(ArtifactPaths::in_dir(dir.path()).config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["feature_cols"], serde_json::json!(["f0", "f1"]));
}
