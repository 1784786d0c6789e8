//! Standard Scaler - per-feature zero mean / unit variance
//!
//! Fitted once on the balanced training rows and stored as an artifact.
//! The same stored statistics are applied to every inference request.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::{FitError, InferenceError};

/// Columns whose std is below this are left unscaled
const ZERO_SCALE_EPSILON: f64 = 10.0 * f64::EPSILON;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature population std (1.0 for constant columns)
    pub scale: Vec<f64>,
    pub n_samples_seen: usize,
}

impl StandardScaler {
    /// Learn mean and std of each column
    pub fn fit(x: &Array2<f64>) -> Result<Self, FitError> {
        let mean = x.mean_axis(Axis(0)).ok_or(FitError::EmptyTrainingSet)?;
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .map(|&s| if s < ZERO_SCALE_EPSILON { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: mean.to_vec(),
            scale,
            n_samples_seen: x.nrows(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Scale a single feature vector
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.n_features() {
            return Err(InferenceError::DimensionMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        let scaled: Vec<f64> = row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect();

        if let Some(index) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite { index });
        }

        Ok(scaled)
    }

    /// Scale every row of a matrix
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        if x.ncols() != self.n_features() {
            return Err(InferenceError::DimensionMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        let scaled = (x - &mean) / &scale;

        if let Some(((_, index), _)) = scaled.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFinite { index });
        }

        Ok(scaled)
    }

    /// Fit and transform in one step
    pub fn fit_transform(x: &Array2<f64>) -> Result<(Self, Array2<f64>), FitError> {
        let scaler = Self::fit(x)?;
        let scaled = scaler
            .transform(x)
            .map_err(|e| FitError::Internal(e.to_string()))?;
        Ok((scaler, scaled))
    }
}
