//! Metrics command: recompute metrics from a scores CSV.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use spoof_eval::{compute_metrics_with, ThresholdPolicy};

pub fn run(input: PathBuf, threshold: Option<f64>, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Loading scores from: {}", input.display());
    }

    let (labels, scores) = load_scores(&input)?;
    println!("Loaded {} scored examples", labels.len());

    let policy = match threshold {
        Some(t) => ThresholdPolicy::Fixed(t),
        None => ThresholdPolicy::EerCut,
    };
    let metrics = compute_metrics_with(&labels, &scores, policy)
        .context("Metrics computation failed")?;

    super::print_metrics(&metrics);
    Ok(())
}

fn load_scores(path: &PathBuf) -> Result<(Vec<i32>, Vec<f64>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let score_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("score"))
        .context("No 'score' column")?;
    let label_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("label"))
        .context("No 'label' column")?;

    let mut labels = Vec::new();
    let mut scores = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let score: f64 = record
            .get(score_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Bad score on line {}", line + 2))?;
        let label: i32 = record
            .get(label_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Bad label on line {}", line + 2))?;
        // Sentinel rows from failed loads never belong in metrics input.
        if label == -1 {
            continue;
        }
        scores.push(score);
        labels.push(label);
    }

    if labels.is_empty() {
        bail!("{} contains no scored examples", path.display());
    }
    Ok((labels, scores))
}
