//! Features Module - Transaction feature schema
//!
//! Layout (names, order, hash) and validation of incoming vectors.

pub mod layout;
pub mod vector;


// Re-export common types
pub use layout::{compute_layout_hash, default_feature_names, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{demo_vectors, DemoVectors, FeatureError, FeatureVector};
