//! Report types for evaluation results.
//!
//! A [`DatasetReport`] holds the metrics and per-example scores for one
//! manifest; a [`GroupReport`] collects the datasets of one run in input
//! order together with the cross-dataset average.

use serde::{Deserialize, Serialize};

use crate::metrics::{average_metrics, MetricResult, UNDEFINED};

/// One scored example: the model score and the ground-truth label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Raw model score, higher = more spoof-like.
    pub score: f64,
    /// Ground-truth label: 0 = bonafide, 1 = spoof.
    pub label: i32,
}

/// Result of evaluating one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Dataset name (manifest stem or group entry name).
    pub name: String,

    /// Detection metrics for this dataset.
    pub metrics: MetricResult,

    /// Number of examples that were scored.
    pub num_scored: usize,

    /// Number of examples dropped because loading or preprocessing failed.
    pub num_failed: usize,

    /// Per-example scores, in manifest order. Written to the scores CSV,
    /// not serialized into the report itself.
    #[serde(skip)]
    pub rows: Vec<ScoreRow>,
}

/// A dataset that was skipped during a group run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDataset {
    /// Dataset name.
    pub name: String,
    /// Why it was skipped (missing manifest, degenerate input, ...).
    pub reason: String,
}

/// Result of evaluating a named group of datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    /// Group name (or the single dataset's name).
    pub name: String,

    /// Per-dataset reports, in input order.
    pub datasets: Vec<DatasetReport>,

    /// Datasets skipped instead of evaluated.
    pub skipped: Vec<SkippedDataset>,

    /// Unweighted mean over datasets with a valid ROC; `None` when every
    /// dataset was single-class or skipped.
    pub average: Option<MetricResult>,

    /// When this report was generated.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl GroupReport {
    /// Create an empty group report.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            datasets: Vec::new(),
            skipped: Vec::new(),
            average: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Recompute the cross-dataset average from the current datasets.
    pub fn finalize(&mut self) {
        let all: Vec<MetricResult> = self.datasets.iter().map(|d| d.metrics).collect();
        self.average = average_metrics(&all);
    }

    /// Consolidated metrics as a YAML mapping, dataset name to metric
    /// record, in input dataset order.
    pub fn metrics_yaml(&self) -> crate::error::Result<String> {
        let mut root = serde_yaml::Mapping::new();
        for dataset in &self.datasets {
            let value = serde_yaml::to_value(dataset.metrics)?;
            root.insert(serde_yaml::Value::String(dataset.name.clone()), value);
        }
        Ok(serde_yaml::to_string(&serde_yaml::Value::Mapping(root))?)
    }

    /// Render the per-dataset metrics plus the average row as a LaTeX
    /// tabular. Undefined metrics render as `--`.
    #[must_use]
    pub fn to_latex_table(&self) -> String {
        let mut out = String::new();
        out.push_str("\\begin{tabular}{lrrrrr}\n");
        out.push_str("\\toprule\n");
        out.push_str("Dataset & EER (\\%) & AUC & Acc (\\%) & TPR (\\%) & TNR (\\%) \\\\\n");
        out.push_str("\\midrule\n");
        for dataset in &self.datasets {
            out.push_str(&latex_row(&escape_latex(&dataset.name), &dataset.metrics));
        }
        if let Some(avg) = &self.average {
            out.push_str("\\midrule\n");
            out.push_str(&latex_row("Average", avg));
        }
        out.push_str("\\bottomrule\n");
        out.push_str("\\end{tabular}\n");
        out
    }
}

fn latex_row(name: &str, m: &MetricResult) -> String {
    format!(
        "{} & {} & {} & {} & {} & {} \\\\\n",
        name,
        latex_pct(m.eer),
        latex_plain(m.auc),
        latex_pct(m.accuracy),
        latex_pct(m.tpr),
        latex_pct(m.tnr),
    )
}

fn latex_pct(v: f64) -> String {
    if v == UNDEFINED {
        "--".to_string()
    } else {
        format!("{:.2}", v * 100.0)
    }
}

fn latex_plain(v: f64) -> String {
    if v == UNDEFINED {
        "--".to_string()
    } else {
        format!("{v:.4}")
    }
}

fn escape_latex(s: &str) -> String {
    s.replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(names_and_eer: &[(&str, f64)]) -> GroupReport {
        let mut report = GroupReport::new("test_group".to_string());
        for &(name, eer) in names_and_eer {
            report.datasets.push(DatasetReport {
                name: name.to_string(),
                metrics: MetricResult {
                    eer,
                    auc: if eer == UNDEFINED { UNDEFINED } else { 0.9 },
                    accuracy: 0.8,
                    tpr: if eer == UNDEFINED { UNDEFINED } else { 0.7 },
                    tnr: 0.9,
                },
                num_scored: 10,
                num_failed: 0,
                rows: Vec::new(),
            });
        }
        report.finalize();
        report
    }

    #[test]
    fn test_finalize_excludes_single_class() {
        let report = report_with(&[("a", 0.1), ("b", 0.3), ("c", UNDEFINED)]);
        let avg = report.average.unwrap();
        assert!((avg.eer - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_finalize_all_single_class() {
        let report = report_with(&[("a", UNDEFINED)]);
        assert!(report.average.is_none());
    }

    #[test]
    fn test_metrics_yaml_preserves_order() {
        let report = report_with(&[("zulu", 0.1), ("alpha", 0.2)]);
        let yaml = report.metrics_yaml().unwrap();
        let zulu = yaml.find("zulu:").unwrap();
        let alpha = yaml.find("alpha:").unwrap();
        assert!(zulu < alpha);
        assert!(yaml.contains("eer: 0.1"));
    }

    #[test]
    fn test_latex_table() {
        let report = report_with(&[("in_the_wild", 0.25), ("jvnv", UNDEFINED)]);
        let latex = report.to_latex_table();
        assert!(latex.contains("in\\_the\\_wild & 25.00 & 0.9000"));
        assert!(latex.contains("jvnv & -- & --"));
        assert!(latex.contains("Average & 25.00"));
        assert!(latex.starts_with("\\begin{tabular}"));
    }
}
