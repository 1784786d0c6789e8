//! Dataset Module - loading, splitting, balancing

pub mod loader;
pub mod split;


use std::path::PathBuf;
use thiserror::Error;

pub use loader::{Dataset, DatasetSummary};
pub use split::{stratified_split, undersample, SplitIndices};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Row {row}: column '{column}' has non-numeric value '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: column '{column}' is NaN or infinite")]
    NonFinite { row: usize, column: String },

    #[error("Row {row}: target must be 0 or 1, got '{value}'")]
    InvalidLabel { row: usize, value: String },

    #[error("Dataset has no rows")]
    Empty,

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Matrix is {rows}x{cols} but got {labels} labels and {names} column names")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        labels: usize,
        names: usize,
    },

    #[error("test_size must be in (0, 1), got {0}")]
    InvalidTestSize(f64),

    #[error("Cannot undersample: {positives} positives but only {negatives} negatives")]
    InsufficientMajority { positives: usize, negatives: usize },
}
