//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema of the transaction vector.**
//!
//! The order below is the order of the columns the trainer selects from
//! the dataset, the order the scaler stores its statistics in, and the
//! order every `/predict` request must follow.

use crc32fast::Hasher;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "Time",   // 0: Seconds since the first transaction in the dataset
    // === PCA components (1-28) ===
    "V1", "V2", "V3", "V4", "V5", "V6", "V7",
    "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21",
    "V22", "V23", "V24", "V25", "V26", "V27", "V28",
    "Amount", // 29: Transaction amount
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 30;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered list of feature names
///
/// Stored in the config artifact so a renamed or reordered list is
/// detected when the model is loaded.
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Built-in layout as owned strings (what the trainer persists)
pub fn default_feature_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// TESTS
// ============================================================================
