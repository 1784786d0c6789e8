//! Logic Module - Business Logic & Engines
//!
//! ## Layout
//! - `features/` - Feature schema (names, order, hash) and input validation
//! - `dataset/` - CSV loading, stratified split, undersampling
//! - `model/` - Scaler, random forest, metrics, inference
//! - `artifacts/` - Persisted scaler / model / config
//! - `training` - The offline training pipeline

pub mod artifacts;
pub mod dataset;
pub mod features;
pub mod model;
pub mod training;
