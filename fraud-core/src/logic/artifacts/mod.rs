//! Artifacts Module - persisted scaler, classifier and config
//!
//! Three JSON files in one directory. They are produced together by the
//! trainer and only ever loaded together.

pub mod storage;
pub mod types;
pub mod validate;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logic::model::InferenceError;

pub use storage::{load_artifacts, save_artifacts, ArtifactPaths};
pub use types::ModelConfig;
pub use validate::{sha256_hex, validate_artifacts};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Feature layout mismatch: config says {expected:08x}, names hash to {actual:08x}")]
    LayoutMismatch { expected: u32, actual: u32 },

    #[error("{artifact} expects {actual} features but config lists {expected}")]
    ShapeMismatch {
        artifact: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Model(#[from] InferenceError),

    #[error("Invalid artifact: {0}")]
    Invalid(String),
}

impl ArtifactError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn serialization(path: &Path, source: serde_json::Error) -> Self {
        ArtifactError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when a file is simply absent (no model trained yet)
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
