//! Random Forest - bagged CART trees with Gini impurity
//!
//! Trees are stored as flat node arrays so the whole forest serializes to
//! a single JSON artifact. `predict_proba` averages the per-tree leaf
//! class frequencies.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{FitError, InferenceError};
use crate::constants::{DEFAULT_N_ESTIMATORS, DEFAULT_SEED};

// ============================================================================
// PARAMETERS
// ============================================================================

/// Number of candidate features examined per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k.min(n_features),
        };
        n.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// `None` grows trees until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

// ============================================================================
// DECISION TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Fraction of fraud samples that reached this leaf
        fraud_proba: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

/// Best split found for a node
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Borrowed training data shared by every node of a tree
struct FitContext<'a> {
    x: &'a Array2<f64>,
    y: &'a [u8],
    params: &'a ForestParams,
    max_features: usize,
}

impl DecisionTree {
    fn fit(ctx: &FitContext<'_>, samples: &mut [usize], rng: &mut ChaCha8Rng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build_node(ctx, samples, 0, rng);
        tree
    }

    fn build_node(
        &mut self,
        ctx: &FitContext<'_>,
        samples: &mut [usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> usize {
        let n = samples.len();
        let positives = samples.iter().filter(|&&i| ctx.y[i] == 1).count();

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            fraud_proba: positives as f64 / n as f64,
            samples: n,
        });

        let pure = positives == 0 || positives == n;
        let too_deep = ctx.params.max_depth.is_some_and(|d| depth >= d);
        if pure || too_deep || n < ctx.params.min_samples_split {
            return idx;
        }

        let Some(split) = best_split(ctx, samples, rng) else {
            return idx;
        };

        // Partition samples in place: `<= threshold` goes left
        let mut mid = 0;
        for k in 0..n {
            if ctx.x[[samples[k], split.feature]] <= split.threshold {
                samples.swap(k, mid);
                mid += 1;
            }
        }

        // A threshold that fails to separate would recurse on the same rows
        if mid == 0 || mid == n {
            return idx;
        }

        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.build_node(ctx, left_samples, depth + 1, rng);
        let right = self.build_node(ctx, right_samples, depth + 1, rng);

        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };

        idx
    }

    /// Fraud probability for one (already scaled) row
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { fraud_proba, .. } => return *fraud_proba,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Structural check for trees read from disk.
    ///
    /// Children must point forward so traversal always terminates.
    pub fn validate(&self, n_features: usize) -> Result<(), InferenceError> {
        if self.nodes.is_empty() {
            return Err(InferenceError::CorruptModel("tree has no nodes".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { fraud_proba, .. } => {
                    if !(0.0..=1.0).contains(fraud_proba) {
                        return Err(InferenceError::CorruptModel(format!(
                            "leaf {} has probability {}",
                            idx, fraud_proba
                        )));
                    }
                }
                Node::Split { feature, threshold, left, right } => {
                    let forward = |child: usize| child > idx && child < self.nodes.len();
                    if *feature >= n_features || !threshold.is_finite() || !forward(*left) || !forward(*right) {
                        return Err(InferenceError::CorruptModel(format!(
                            "split node {} is malformed",
                            idx
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// Search up to `max_features` non-constant features for the split with
/// the lowest weighted Gini impurity.
fn best_split(ctx: &FitContext<'_>, samples: &[usize], rng: &mut ChaCha8Rng) -> Option<SplitCandidate> {
    let n = samples.len();
    let min_leaf = ctx.params.min_samples_leaf.max(1);
    let total_pos = samples.iter().filter(|&&i| ctx.y[i] == 1).count();

    let mut features: Vec<usize> = (0..ctx.x.ncols()).collect();
    features.shuffle(rng);

    let mut best: Option<SplitCandidate> = None;
    let mut visited = 0;
    let mut column: Vec<(f64, u8)> = Vec::with_capacity(n);

    for feature in features {
        if visited >= ctx.max_features {
            break;
        }

        column.clear();
        column.extend(samples.iter().map(|&i| (ctx.x[[i, feature]], ctx.y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[n - 1].0 {
            continue;
        }
        visited += 1;

        let mut left_pos = 0;
        for k in 0..n - 1 {
            if column[k].1 == 1 {
                left_pos += 1;
            }
            if column[k].0 == column[k + 1].0 {
                continue;
            }

            let n_left = k + 1;
            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let impurity = (n_left as f64 * gini(left_pos, n_left)
                + n_right as f64 * gini(total_pos - left_pos, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let (lo, hi) = (column[k].0, column[k + 1].0);
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some(SplitCandidate { feature, threshold, impurity });
            }
        }
    }

    best
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub params: ForestParams,
    pub n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit `params.n_estimators` trees, each on its own bootstrap sample.
    ///
    /// Tree `t` draws from a `ChaCha8Rng` seeded with `seed + t`, so a
    /// given (data, params) pair always yields the same forest.
    pub fn fit(x: &Array2<f64>, y: &[u8], params: &ForestParams) -> Result<Self, FitError> {
        let n = x.nrows();
        if n == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        if y.len() != n {
            return Err(FitError::LabelCount { rows: n, labels: y.len() });
        }
        if params.n_estimators == 0 {
            return Err(FitError::InvalidParams("n_estimators must be > 0".to_string()));
        }

        let ctx = FitContext {
            x,
            y,
            params,
            max_features: params.max_features.resolve(x.ncols()),
        };

        let trees = (0..params.n_estimators)
            .map(|t| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let mut samples: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(&ctx, &mut samples, &mut rng)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Forest fitted: {} trees, max depth {}",
            trees.len(),
            trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
        );

        Ok(Self {
            params: params.clone(),
            n_features: x.ncols(),
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// `[P(legitimate), P(fraud)]` for one scaled row
    pub fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::DimensionMismatch {
                stage: "classifier",
                expected: self.n_features,
                actual: row.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(InferenceError::CorruptModel("forest has no trees".to_string()));
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        let fraud = (sum / self.trees.len() as f64).clamp(0.0, 1.0);

        Ok([1.0 - fraud, fraud])
    }

    /// Class with the highest probability; ties resolve to legitimate
    pub fn predict(&self, row: &[f64]) -> Result<bool, InferenceError> {
        let [legit, fraud] = self.predict_proba(row)?;
        Ok(fraud > legit)
    }

    /// Validate every tree against the declared feature count
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::CorruptModel("forest has no trees".to_string()));
        }
        self.trees.iter().try_for_each(|t| t.validate(self.n_features))
    }
}
