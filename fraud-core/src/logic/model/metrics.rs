//! Evaluation metrics for the held-out test partition
//!
//! Class 0 = legitimate, Class 1 = fraud.

use serde::Serialize;

/// Confusion matrix counts with fraud as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

impl ConfusionCounts {
    pub fn from_labels(predictions: &[u8], labels: &[u8]) -> Self {
        assert_eq!(
            predictions.len(),
            labels.len(),
            "predictions and labels must have same length"
        );

        let mut counts = Self::default();
        for (&pred, &label) in predictions.iter().zip(labels) {
            match (pred, label) {
                (1, 1) => counts.tp += 1,
                (1, _) => counts.fp += 1,
                (_, 1) => counts.fn_count += 1,
                _ => counts.tn += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }
}

/// Precision / recall / F1 for one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(tp: usize, fp: usize, fn_count: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_count);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
            support: tp + fn_count,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Per-class and averaged metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub legitimate: ClassMetrics,
    pub fraud: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionCounts,
}

impl ClassificationReport {
    pub fn compute(predictions: &[u8], labels: &[u8]) -> Self {
        let c = ConfusionCounts::from_labels(predictions, labels);

        let fraud = ClassMetrics::from_counts(c.tp, c.fp, c.fn_count);
        let legitimate = ClassMetrics::from_counts(c.tn, c.fn_count, c.fp);
        let total = c.total();

        let macro_avg = ClassMetrics {
            precision: (legitimate.precision + fraud.precision) / 2.0,
            recall: (legitimate.recall + fraud.recall) / 2.0,
            f1: (legitimate.f1 + fraud.f1) / 2.0,
            support: total,
        };

        let weight = |a: f64, b: f64| {
            if total == 0 {
                0.0
            } else {
                (a * legitimate.support as f64 + b * fraud.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weight(legitimate.precision, fraud.precision),
            recall: weight(legitimate.recall, fraud.recall),
            f1: weight(legitimate.f1, fraud.f1),
            support: total,
        };

        Self {
            legitimate,
            fraud,
            accuracy: ratio(c.tp + c.tn, total),
            macro_avg,
            weighted_avg,
            confusion: c,
        }
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        row(f, "0", &self.legitimate)?;
        row(f, "1", &self.fraud)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}

fn row(f: &mut std::fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> std::fmt::Result {
    writeln!(
        f,
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

/// Area under the ROC curve.
///
/// Computed from the Mann-Whitney U statistic with average ranks for tied
/// scores. `None` when either class is missing.
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> Option<f64> {
    assert_eq!(labels.len(), scores.len(), "labels and scores must have same length");

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut pos_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }

        // ranks are 1-based; tied block [start, end) shares the mean rank
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        let tied_pos = order[start..end].iter().filter(|&&i| labels[i] == 1).count();
        pos_rank_sum += avg_rank * tied_pos as f64;

        start = end;
    }

    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}
