//! Central Configuration Constants
//!
//! Single source of truth for training and artifact defaults.
//! The trainer CLI and the API server both read from here.

/// Name of the binary target column in the training dataset
pub const TARGET_COLUMN: &str = "Class";

/// Default dataset location (relative to the working directory)
pub const DEFAULT_DATASET_PATH: &str = "../creditcard.csv";

/// Default directory for model artifacts
pub const DEFAULT_MODEL_DIR: &str = ".";

/// Scaler artifact file name
pub const SCALER_FILE: &str = "scaler.json";

/// Classifier artifact file name
pub const MODEL_FILE: &str = "model.json";

/// Config artifact file name (feature list + checksums)
pub const CONFIG_FILE: &str = "config.json";

/// Fraction of rows held out for evaluation
pub const DEFAULT_TEST_SIZE: f64 = 0.3;

/// Seed shared by the split, the undersampler and the forest
pub const DEFAULT_SEED: u64 = 42;

/// Number of trees in the forest
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Amount used by the demo "fraud" vector
pub const DEMO_FRAUD_AMOUNT: f64 = 10_000.0;

/// Crate version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
