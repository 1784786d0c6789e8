//! Trainer - offline, one-shot model fitting
//!
//! load → stratified split → undersample train partition → fit scaler →
//! fit forest → evaluate on the untouched test partition → save artifacts.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::constants::{DEFAULT_DATASET_PATH, DEFAULT_MODEL_DIR, DEFAULT_TEST_SIZE, TARGET_COLUMN};
use crate::logic::artifacts::{save_artifacts, ArtifactError, ModelConfig};
use crate::logic::dataset::{stratified_split, undersample, Dataset, DatasetError, DatasetSummary};
use crate::logic::features::default_feature_names;
use crate::logic::model::{
    roc_auc, ClassificationReport, FitError, ForestParams, InferenceError, Predictor, RandomForest,
    StandardScaler,
};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub dataset_path: PathBuf,
    pub output_dir: PathBuf,
    pub feature_cols: Vec<String>,
    pub target_column: String,
    pub test_size: f64,
    /// Drives the split, the undersampler and (via `forest.seed`) the trees
    pub seed: u64,
    pub forest: ForestParams,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let forest = ForestParams::default();
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            output_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            feature_cols: default_feature_names(),
            target_column: TARGET_COLUMN.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            seed: forest.seed,
            forest,
        }
    }
}

// ============================================================================
// ERRORS & REPORT
// ============================================================================

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Training partition has no positive ({target} = 1) rows; cannot balance classes")]
    DegenerateDataset { target: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub dataset: DatasetSummary,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Rows in the undersampled training set (2 x positives)
    pub balanced_rows: usize,
    pub balanced_positives: usize,
    pub classification: ClassificationReport,
    /// `None` when the test partition holds a single class
    pub roc_auc: Option<f64>,
}

/// In-memory result of a training run
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub config: ModelConfig,
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    pub report: TrainReport,
}

impl TrainedModel {
    pub fn into_predictor(self) -> Predictor {
        Predictor::new(self.config, self.scaler, self.forest)
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Fit and evaluate on an already loaded dataset. No file I/O.
pub fn train_on(dataset: &Dataset, config: &TrainConfig) -> Result<TrainedModel, TrainError> {
    let summary = dataset.summary();
    log::info!("Dataset shape: ({}, {})", summary.rows, summary.columns);
    log::info!(
        "Fraud cases: {} ({:.2}%)",
        summary.positives,
        summary.positive_ratio * 100.0
    );

    let split = stratified_split(&dataset.labels, config.test_size, config.seed)?;

    let balanced = undersample(&dataset.labels, &split.train, config.seed)?;
    if balanced.is_empty() {
        return Err(TrainError::DegenerateDataset {
            target: config.target_column.clone(),
        });
    }

    let (x_train, y_train) = dataset.select(&balanced);
    let balanced_positives = y_train.iter().filter(|&&l| l == 1).count();
    log::info!("Balanced training set: ({}, {})", x_train.nrows(), x_train.ncols());

    // Scaler sees balanced training rows only
    let (scaler, x_train_scaled) = StandardScaler::fit_transform(&x_train)?;

    log::info!(
        "Training random forest ({} trees, seed {})",
        config.forest.n_estimators,
        config.forest.seed
    );
    let forest = RandomForest::fit(&x_train_scaled, &y_train, &config.forest)?;

    // Evaluate on the untouched, unbalanced test partition
    let (x_test, y_test) = dataset.select(&split.test);
    let x_test_scaled = scaler.transform(&x_test)?;

    let mut predictions = Vec::with_capacity(y_test.len());
    let mut scores = Vec::with_capacity(y_test.len());
    for row in x_test_scaled.rows() {
        let [legit, fraud] = forest.predict_proba(&row.to_vec())?;
        predictions.push(u8::from(fraud > legit));
        scores.push(fraud);
    }

    let classification = ClassificationReport::compute(&predictions, &y_test);
    let auc = if y_test.is_empty() { None } else { roc_auc(&y_test, &scores) };

    let report = TrainReport {
        dataset: summary,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        balanced_rows: balanced.len(),
        balanced_positives,
        classification,
        roc_auc: auc,
    };

    Ok(TrainedModel {
        config: ModelConfig::new(dataset.feature_names.clone(), config.forest.clone()),
        scaler,
        forest,
        report,
    })
}

/// Full trainer run: read the CSV, train, persist the three artifacts
pub fn run(config: &TrainConfig) -> Result<TrainedModel, TrainError> {
    let dataset = Dataset::from_csv(&config.dataset_path, &config.feature_cols, &config.target_column)?;

    let mut trained = train_on(&dataset, config)?;

    trained.config = save_artifacts(
        &config.output_dir,
        &trained.scaler,
        &trained.forest,
        trained.config.clone(),
    )?;

    Ok(trained)
}
