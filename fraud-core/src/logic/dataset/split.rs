//! Train/test splitting and class balancing
//!
//! Both operate on row indices so the feature matrix is copied only once,
//! when the final partitions are materialized.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::DatasetError;

/// Row indices of the two partitions
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Perform stratified train/test split preserving class ratios.
///
/// Each class contributes `round(n_class * test_size)` rows to the test
/// partition.
pub fn stratified_split(
    labels: &[u8],
    test_size: f64,
    seed: u64,
) -> Result<SplitIndices, DatasetError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DatasetError::InvalidTestSize(test_size));
    }

    let mut class0: Vec<usize> = Vec::new();
    let mut class1: Vec<usize> = Vec::new();
    for (i, &l) in labels.iter().enumerate() {
        if l == 1 {
            class1.push(i);
        } else {
            class0.push(i);
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    class0.shuffle(&mut rng);
    class1.shuffle(&mut rng);

    let test0 = (class0.len() as f64 * test_size).round() as usize;
    let test1 = (class1.len() as f64 * test_size).round() as usize;

    let mut test: Vec<usize> = class0[..test0]
        .iter()
        .chain(class1[..test1].iter())
        .copied()
        .collect();
    let mut train: Vec<usize> = class0[test0..]
        .iter()
        .chain(class1[test1..].iter())
        .copied()
        .collect();

    test.sort_unstable();
    train.sort_unstable();

    log::debug!(
        "Split: train={} ({}+{}) test={} ({}+{})",
        train.len(),
        class0.len() - test0,
        class1.len() - test1,
        test.len(),
        test0,
        test1,
    );

    Ok(SplitIndices { train, test })
}

/// Random undersampling of the majority (legitimate) class.
///
/// Returns every positive index from `indices` followed by an equally
/// sized sample of negatives, drawn without replacement. A partition with
/// no positives yields an empty set.
pub fn undersample(labels: &[u8], indices: &[usize], seed: u64) -> Result<Vec<usize>, DatasetError> {
    let (positives, negatives): (Vec<usize>, Vec<usize>) =
        indices.iter().copied().partition(|&i| labels[i] == 1);

    if negatives.len() < positives.len() {
        return Err(DatasetError::InsufficientMajority {
            positives: positives.len(),
            negatives: negatives.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sampled = negatives.choose_multiple(&mut rng, positives.len()).copied();

    let mut balanced = positives;
    balanced.extend(sampled);

    Ok(balanced)
}
