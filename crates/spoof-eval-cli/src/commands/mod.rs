//! CLI subcommand implementations.

pub mod evaluate;
pub mod manifest;
pub mod metrics;

use spoof_eval::MetricResult;

/// Print one dataset's metrics in the benchmark's console format.
pub fn print_metrics(metrics: &MetricResult) {
    if !metrics.has_roc() {
        println!(
            "  -> Single class dataset. Accuracy: {:.2}%",
            metrics.accuracy * 100.0
        );
        return;
    }
    println!(
        "  EER: {:.2}% | AUC: {:.4} | Accuracy: {:.2}%",
        metrics.eer * 100.0,
        metrics.auc,
        metrics.accuracy * 100.0
    );
    println!(
        "  TPR: {:.2}% | TNR: {:.2}%",
        metrics.tpr * 100.0,
        metrics.tnr * 100.0
    );
}

/// One-line recap of a dataset's metrics, used in the group summary.
pub fn summary_line(name: &str, metrics: &MetricResult) -> String {
    if !metrics.has_roc() {
        return format!(
            "- {}: Single class dataset (Acc={:.2}%)",
            name,
            metrics.accuracy * 100.0
        );
    }
    format!(
        "- {}: EER={:.2}%, AUC={:.4}, Acc={:.2}%",
        name,
        metrics.eer * 100.0,
        metrics.auc,
        metrics.accuracy * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_two_class() {
        let metrics = MetricResult {
            eer: 0.125,
            auc: 0.9876,
            accuracy: 0.9,
            tpr: 0.8,
            tnr: 0.95,
        };
        assert_eq!(
            summary_line("itw", &metrics),
            "- itw: EER=12.50%, AUC=0.9876, Acc=90.00%"
        );
    }

    #[test]
    fn test_summary_line_single_class() {
        let metrics = MetricResult {
            eer: -1.0,
            auc: -1.0,
            accuracy: 0.75,
            tpr: -1.0,
            tnr: 0.75,
        };
        assert_eq!(
            summary_line("jvnv", &metrics),
            "- jvnv: Single class dataset (Acc=75.00%)"
        );
    }
}
