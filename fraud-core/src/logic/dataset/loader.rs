//! Dataset Loader - labeled transactions from CSV
//!
//! Selects the configured feature columns (in layout order) and the
//! binary target column from a headered CSV file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array2, Axis};
use serde::Serialize;

use super::DatasetError;

// ============================================================================
// DATASET
// ============================================================================

/// Labeled feature matrix
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names, in the order of `features` columns
    pub feature_names: Vec<String>,
    /// One row per transaction
    pub features: Array2<f64>,
    /// 1 = fraud, 0 = legitimate
    pub labels: Vec<u8>,
}

/// Shape and class balance, logged by the trainer
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub positives: usize,
    pub positive_ratio: f64,
}

impl Dataset {
    /// Build from an in-memory matrix
    pub fn new(
        feature_names: Vec<String>,
        features: Array2<f64>,
        labels: Vec<u8>,
    ) -> Result<Self, DatasetError> {
        if features.nrows() != labels.len() || features.ncols() != feature_names.len() {
            return Err(DatasetError::ShapeMismatch {
                rows: features.nrows(),
                cols: features.ncols(),
                labels: labels.len(),
                names: feature_names.len(),
            });
        }

        Ok(Self { feature_names, features, labels })
    }

    /// Load from a CSV file on disk
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        feature_cols: &[String],
        target: &str,
    ) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        log::info!("Loading dataset from: {}", path.display());

        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file, feature_cols, target)
    }

    /// Load from any CSV reader
    pub fn from_reader<R: Read>(
        reader: R,
        feature_cols: &[String],
        target: &str,
    ) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        let feature_idx = feature_cols
            .iter()
            .map(|c| column_index(c.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let target_idx = column_index(target)?;

        let mut values = Vec::new();
        let mut labels = Vec::new();

        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;

            for (&idx, name) in feature_idx.iter().zip(feature_cols) {
                let cell = record.get(idx).unwrap_or("");
                let value: f64 = cell.parse().map_err(|_| DatasetError::Parse {
                    row,
                    column: name.clone(),
                    value: cell.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(DatasetError::NonFinite {
                        row,
                        column: name.clone(),
                    });
                }
                values.push(value);
            }

            let raw = record.get(target_idx).unwrap_or("");
            let label = parse_label(raw).ok_or_else(|| DatasetError::InvalidLabel {
                row,
                value: raw.to_string(),
            })?;
            labels.push(label);
        }

        if labels.is_empty() {
            return Err(DatasetError::Empty);
        }

        let features = Array2::from_shape_vec((labels.len(), feature_cols.len()), values)?;

        Ok(Self {
            feature_names: feature_cols.to_vec(),
            features,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of fraud rows
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    pub fn summary(&self) -> DatasetSummary {
        let positives = self.positives();
        DatasetSummary {
            rows: self.len(),
            columns: self.features.ncols(),
            positives,
            positive_ratio: if self.is_empty() {
                0.0
            } else {
                positives as f64 / self.len() as f64
            },
        }
    }

    /// Copy the given rows out as a (features, labels) pair
    pub fn select(&self, indices: &[usize]) -> (Array2<f64>, Vec<u8>) {
        let features = self.features.select(Axis(0), indices);
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        (features, labels)
    }
}

/// Accept `0`/`1` in integer or float spelling
fn parse_label(raw: &str) -> Option<u8> {
    let value: f64 = raw.parse().ok()?;
    if value == 0.0 {
        Some(0)
    } else if value == 1.0 {
        Some(1)
    } else {
        None
    }
}
