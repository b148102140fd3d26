//! Receiver-operating-characteristic curve construction.
//!
//! The curve is swept over distinct score values in descending order, with a
//! leading sentinel point at threshold `+inf` where nothing is predicted
//! positive. This matches the curve shape the benchmark's historical numbers
//! were computed against, so EER indices and thresholds line up exactly.

/// ROC curve over a two-class (labels, scores) population.
///
/// All three vectors have the same length. `thresholds` is strictly
/// descending, starting at `+inf`; `fpr` and `tpr` are non-decreasing and end
/// at 1.0. A prediction at `thresholds[i]` means `score >= thresholds[i]`.
#[derive(Debug, Clone)]
pub struct RocCurve {
    /// False-positive rate at each threshold.
    pub fpr: Vec<f64>,
    /// True-positive rate at each threshold.
    pub tpr: Vec<f64>,
    /// Decision thresholds, descending.
    pub thresholds: Vec<f64>,
}

impl RocCurve {
    /// Build the ROC curve for the given labels and scores.
    ///
    /// Requires both classes to be present; callers are expected to have
    /// validated that (the single-class case has no ROC).
    #[must_use]
    pub fn compute(labels: &[i32], scores: &[f64]) -> Self {
        let positives = labels.iter().filter(|&&l| l == 1).count() as f64;
        let negatives = labels.len() as f64 - positives;

        // Stable sort by score, highest first.
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut fpr = vec![0.0];
        let mut tpr = vec![0.0];
        let mut thresholds = vec![f64::INFINITY];

        let mut tp = 0.0;
        let mut fp = 0.0;
        for (rank, &idx) in order.iter().enumerate() {
            if labels[idx] == 1 {
                tp += 1.0;
            } else {
                fp += 1.0;
            }
            // Emit a point only once all examples tied at this score are
            // counted, so ties share a single threshold.
            let next = order.get(rank + 1);
            if next.is_none_or(|&n| scores[n] < scores[idx]) {
                fpr.push(fp / negatives);
                tpr.push(tp / positives);
                thresholds.push(scores[idx]);
            }
        }

        Self {
            fpr,
            tpr,
            thresholds,
        }
    }

    /// Index of the equal-error-rate point: the first index minimizing
    /// `|fnr - fpr|` in sweep order.
    #[must_use]
    pub fn eer_index(&self) -> usize {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for (i, (&fpr, &tpr)) in self.fpr.iter().zip(&self.tpr).enumerate() {
            let diff = ((1.0 - tpr) - fpr).abs();
            if diff < best_diff {
                best_diff = diff;
                best = i;
            }
        }
        best
    }

    /// Area under the curve by the trapezoidal rule.
    #[must_use]
    pub fn auc(&self) -> f64 {
        let mut area = 0.0;
        for i in 1..self.fpr.len() {
            area += (self.fpr[i] - self.fpr[i - 1]) * (self.tpr[i] + self.tpr[i - 1]) / 2.0;
        }
        area
    }
}
