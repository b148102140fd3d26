//! Detection-quality metrics for binary spoof/bonafide classification.
//!
//! This module is the scoring core of the benchmark: given ground-truth
//! labels (0 = bonafide, 1 = spoof) and continuous model scores (higher =
//! more spoof-like), it derives:
//!
//! - **EER**: error rate at the threshold where FPR and FNR meet
//! - **AUC**: area under the ROC curve
//! - **Accuracy, TPR, TNR**: confusion-matrix rates at a decision threshold
//!
//! Metrics that cannot be computed for a given input are reported as the
//! sentinel `-1.0` rather than an error: a dataset containing only one class
//! has no ROC, so EER and AUC degrade to `-1.0` while accuracy and the rate
//! for the class that is present are still computed at a fixed 0.5
//! threshold.
//!
//! All functions here are pure and touch no I/O; they are safe to call
//! concurrently on disjoint inputs.

mod roc;

pub use roc::RocCurve;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel value for a metric that is undefined for the given input.
pub const UNDEFINED: f64 = -1.0;

/// How the decision threshold for accuracy/TPR/TNR is chosen.
///
/// Two variants of this benchmark existed historically: one thresholded at
/// the EER-minimizing cut point, one at a fixed 0.5. Both are kept and the
/// choice is applied uniformly across a run (see `EvalConfig`), since
/// cross-dataset comparison assumes one decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Threshold at the EER-minimizing cut point.
    EerCut,
    /// Threshold at a fixed score value.
    Fixed(f64),
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::EerCut
    }
}

/// Detection metrics for one evaluated dataset.
///
/// Every field is either in `[0, 1]` or [`UNDEFINED`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Equal error rate.
    pub eer: f64,
    /// Area under the ROC curve.
    pub auc: f64,
    /// Fraction of correct predictions at the decision threshold.
    pub accuracy: f64,
    /// True-positive rate (spoof recall) at the decision threshold.
    pub tpr: f64,
    /// True-negative rate (bonafide recall) at the decision threshold.
    pub tnr: f64,
}

impl MetricResult {
    /// Whether this result came from a two-class dataset with a valid ROC.
    ///
    /// Group averaging only includes results for which this is true.
    #[must_use]
    pub fn has_roc(&self) -> bool {
        self.eer != UNDEFINED
    }
}

/// Compute detection metrics with the default threshold policy
/// ([`ThresholdPolicy::EerCut`]).
///
/// See [`compute_metrics_with`] for the full contract.
pub fn compute_metrics(labels: &[i32], scores: &[f64]) -> Result<MetricResult> {
    compute_metrics_with(labels, scores, ThresholdPolicy::default())
}

/// Compute detection metrics from ground-truth labels and model scores.
///
/// `labels` must contain only 0 and 1 and have the same non-zero length as
/// `scores`; anything else is an [`Error::InvalidInput`]. A single-class
/// input is a supported degenerate path, not an error: EER and AUC are
/// reported as [`UNDEFINED`], predictions fall back to a fixed 0.5
/// threshold, and the rate for the absent class is [`UNDEFINED`].
pub fn compute_metrics_with(
    labels: &[i32],
    scores: &[f64],
    policy: ThresholdPolicy,
) -> Result<MetricResult> {
    if labels.is_empty() {
        return Err(Error::invalid_input("empty input"));
    }
    if labels.len() != scores.len() {
        return Err(Error::invalid_input(format!(
            "length mismatch: {} labels vs {} scores",
            labels.len(),
            scores.len()
        )));
    }
    if let Some(bad) = labels.iter().find(|&&l| l != 0 && l != 1) {
        return Err(Error::invalid_input(format!(
            "label {bad} outside {{0, 1}}"
        )));
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == labels.len() {
        return Ok(single_class_metrics(labels, scores));
    }

    let roc = RocCurve::compute(labels, scores);
    let eer_index = roc.eer_index();
    let eer = roc.fpr[eer_index];
    let auc = roc.auc();

    let threshold = match policy {
        ThresholdPolicy::EerCut => roc.thresholds[eer_index],
        ThresholdPolicy::Fixed(t) => t,
    };
    let (tn, fp, fn_, tp) = confusion_matrix(labels, scores, threshold);

    let accuracy = (tp + tn) as f64 / labels.len() as f64;
    let tpr = rate(tp, tp + fn_);
    let tnr = rate(tn, tn + fp);

    Ok(MetricResult {
        eer,
        auc,
        accuracy,
        tpr,
        tnr,
    })
}

/// Degenerate path: only one class present, so there is no ranking to
/// threshold against. Accuracy and the present class's rate come from a
/// fixed 0.5 cut; the absent class's rate is undefined.
fn single_class_metrics(labels: &[i32], scores: &[f64]) -> MetricResult {
    let (tn, fp, fn_, tp) = confusion_matrix(labels, scores, 0.5);
    let accuracy = (tp + tn) as f64 / labels.len() as f64;

    let all_spoof = labels[0] == 1;
    MetricResult {
        eer: UNDEFINED,
        auc: UNDEFINED,
        accuracy,
        tpr: if all_spoof { rate(tp, tp + fn_) } else { UNDEFINED },
        tnr: if all_spoof { UNDEFINED } else { rate(tn, tn + fp) },
    }
}

/// 2x2 confusion matrix `(tn, fp, fn, tp)` with class order `[0, 1]`.
/// Prediction is 1 when `score >= threshold`.
fn confusion_matrix(labels: &[i32], scores: &[f64], threshold: f64) -> (u64, u64, u64, u64) {
    let mut tn = 0;
    let mut fp = 0;
    let mut fn_ = 0;
    let mut tp = 0;
    for (&label, &score) in labels.iter().zip(scores) {
        let predicted = i32::from(score >= threshold);
        match (label, predicted) {
            (0, 0) => tn += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_ += 1,
            (1, 1) => tp += 1,
            _ => unreachable!("labels validated before this point"),
        }
    }
    (tn, fp, fn_, tp)
}

/// Rate with a zero-denominator guard: an empty denominator reports a
/// neutral 0.0, not an error and not the undefined sentinel.
fn rate(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Unweighted per-field mean over results with a valid ROC.
///
/// Returns `None` when no result has `eer != -1` (e.g. every dataset in the
/// group was single-class).
#[must_use]
pub fn average_metrics(results: &[MetricResult]) -> Option<MetricResult> {
    let valid: Vec<&MetricResult> = results.iter().filter(|m| m.has_roc()).collect();
    if valid.is_empty() {
        return None;
    }
    let n = valid.len() as f64;
    Some(MetricResult {
        eer: valid.iter().map(|m| m.eer).sum::<f64>() / n,
        auc: valid.iter().map(|m| m.auc).sum::<f64>() / n,
        accuracy: valid.iter().map(|m| m.accuracy).sum::<f64>() / n,
        tpr: valid.iter().map(|m| m.tpr).sum::<f64>() / n,
        tnr: valid.iter().map(|m| m.tnr).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_separation() {
        let labels = [0, 0, 1, 1];
        let scores = [0.1, 0.2, 0.8, 0.9];
        let m = compute_metrics(&labels, &scores).unwrap();

        assert_eq!(m.eer, 0.0);
        assert_eq!(m.auc, 1.0);
        assert_eq!(m.accuracy, 1.0);
        assert_eq!(m.tpr, 1.0);
        assert_eq!(m.tnr, 1.0);
    }

    #[test]
    fn test_adversarial_inversion() {
        let labels = [0, 0, 1, 1];
        let scores = [0.9, 0.8, 0.2, 0.1];
        let m = compute_metrics(&labels, &scores).unwrap();

        assert_eq!(m.auc, 0.0);
        assert_eq!(m.eer, 1.0);
    }

    #[test]
    fn test_metrics_in_range() {
        let labels = [0, 1, 0, 1, 0, 1];
        let scores = [0.3, 0.2, 0.6, 0.9, 0.1, 0.7];
        let m = compute_metrics(&labels, &scores).unwrap();

        for v in [m.eer, m.auc, m.accuracy, m.tpr, m.tnr] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_label_swap_symmetry() {
        // Swapping class meaning while negating scores preserves EER/AUC.
        let labels = [0, 0, 1, 1];
        let scores = [0.2, 0.6, 0.4, 0.8];
        let m = compute_metrics(&labels, &scores).unwrap();

        let swapped: Vec<i32> = labels.iter().map(|&l| 1 - l).collect();
        let negated: Vec<f64> = scores.iter().map(|&s| -s).collect();
        let m2 = compute_metrics(&swapped, &negated).unwrap();

        assert!((m.eer - m2.eer).abs() < 1e-12);
        assert!((m.auc - m2.auc).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_matches_confusion_matrix() {
        let labels = [0, 1, 1, 0, 1, 0, 0, 1];
        let scores = [0.2, 0.7, 0.4, 0.6, 0.9, 0.1, 0.55, 0.3];
        let threshold = 0.5;
        let m = compute_metrics_with(&labels, &scores, ThresholdPolicy::Fixed(threshold)).unwrap();

        let correct = labels
            .iter()
            .zip(&scores)
            .filter(|&(&l, &s)| i32::from(s >= threshold) == l)
            .count();
        assert_eq!(m.accuracy, correct as f64 / labels.len() as f64);
    }

    #[test]
    fn test_single_class_all_bonafide() {
        let labels = [0, 0, 0];
        let scores = [0.2, 0.7, 0.4];
        let m = compute_metrics(&labels, &scores).unwrap();

        assert_eq!(m.eer, UNDEFINED);
        assert_eq!(m.auc, UNDEFINED);
        assert_eq!(m.tpr, UNDEFINED);
        // Two of three fall below the fixed 0.5 cut.
        assert!((m.tnr - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert!(!m.has_roc());
    }

    #[test]
    fn test_single_class_all_spoof() {
        let labels = [1, 1];
        let scores = [0.9, 0.3];
        let m = compute_metrics(&labels, &scores).unwrap();

        assert_eq!(m.eer, UNDEFINED);
        assert_eq!(m.auc, UNDEFINED);
        assert_eq!(m.tnr, UNDEFINED);
        assert_eq!(m.tpr, 0.5);
        assert_eq!(m.accuracy, 0.5);
    }

    #[test]
    fn test_threshold_excluding_all_positives() {
        // Positives exist but none clear the cut: TPR must be 0.0, not -1
        // and not a division fault.
        let labels = [0, 1];
        let scores = [0.9, 0.1];
        let m = compute_metrics_with(&labels, &scores, ThresholdPolicy::Fixed(0.95)).unwrap();

        assert_eq!(m.tpr, 0.0);
        assert_eq!(m.tnr, 1.0);
        assert_eq!(m.accuracy, 0.5);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = compute_metrics(&[0, 1, 1], &[0.5, 0.6]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = compute_metrics(&[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_out_of_domain_label_rejected() {
        let err = compute_metrics(&[0, 2, 1], &[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_policy_changes_downstream_rates() {
        // Best separation is at 0.4; a fixed 0.5 cut misclassifies one
        // spoof example, so the two policies disagree on accuracy.
        let labels = [0, 0, 1, 1];
        let scores = [0.1, 0.3, 0.4, 0.9];
        let eer_cut = compute_metrics_with(&labels, &scores, ThresholdPolicy::EerCut).unwrap();
        let fixed = compute_metrics_with(&labels, &scores, ThresholdPolicy::Fixed(0.5)).unwrap();

        assert_eq!(eer_cut.accuracy, 1.0);
        assert_eq!(fixed.accuracy, 0.75);
        // The threshold-free metrics are unaffected by the policy.
        assert_eq!(eer_cut.eer, fixed.eer);
        assert_eq!(eer_cut.auc, fixed.auc);
    }

    #[test]
    fn test_average_skips_single_class() {
        let two_class = MetricResult {
            eer: 0.1,
            auc: 0.9,
            accuracy: 0.8,
            tpr: 0.7,
            tnr: 0.9,
        };
        let single_class = MetricResult {
            eer: UNDEFINED,
            auc: UNDEFINED,
            accuracy: 0.5,
            tpr: UNDEFINED,
            tnr: 0.5,
        };

        let avg = average_metrics(&[two_class, single_class]).unwrap();
        assert_eq!(avg.eer, 0.1);
        assert_eq!(avg.accuracy, 0.8);

        assert!(average_metrics(&[single_class]).is_none());
        assert!(average_metrics(&[]).is_none());
    }
}
