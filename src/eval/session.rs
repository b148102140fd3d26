//! Evaluation session: runs a scorer over manifests and collects metrics.
//!
//! The session owns the configuration and the scorer; datasets are evaluated
//! sequentially, each one independently scored, measured, and persisted.
//! Within a dataset, batches are loaded and scored in parallel, but results
//! are collected in manifest order so the (label, score) pairing can never
//! desynchronize.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::audio::{self, WaveformProcessor};
use crate::config::DatasetSpec;
use crate::error::{Error, Result};
use crate::eval::report::{DatasetReport, GroupReport, ScoreRow, SkippedDataset};
use crate::manifest::{Manifest, ManifestEntry};
use crate::metrics::{compute_metrics_with, ThresholdPolicy};
use crate::scorer::Scorer;

/// Configuration for an evaluation session.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Directory for scores CSVs and the consolidated metrics file.
    pub results_dir: PathBuf,

    /// Number of waveforms scored per batch.
    pub batch_size: usize,

    /// Sample rate waveforms are resampled to before scoring.
    pub target_sample_rate: u32,

    /// Fixed waveform length in samples; `None` leaves lengths untouched.
    pub target_length: Option<usize>,

    /// Decision-threshold policy for accuracy/TPR/TNR, applied uniformly
    /// across all datasets in the run.
    pub threshold_policy: ThresholdPolicy,
}

impl EvalConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    results_dir: Option<PathBuf>,
    batch_size: Option<usize>,
    target_sample_rate: Option<u32>,
    target_length: Option<Option<usize>>,
    threshold_policy: Option<ThresholdPolicy>,
}

impl EvalConfigBuilder {
    /// Set the results output directory.
    #[must_use]
    pub fn results_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(path.into());
        self
    }

    /// Set the scoring batch size.
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set the target sample rate.
    #[must_use]
    pub fn target_sample_rate(mut self, rate: u32) -> Self {
        self.target_sample_rate = Some(rate);
        self
    }

    /// Set the fixed waveform length (`None` disables padding/trimming).
    #[must_use]
    pub fn target_length(mut self, length: Option<usize>) -> Self {
        self.target_length = Some(length);
        self
    }

    /// Set the decision-threshold policy.
    #[must_use]
    pub fn threshold_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.threshold_policy = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// # Panics
    ///
    /// Panics if `results_dir` is not set.
    #[must_use]
    pub fn build(self) -> EvalConfig {
        EvalConfig {
            results_dir: self.results_dir.expect("results_dir is required"),
            batch_size: self.batch_size.unwrap_or(16).max(1),
            target_sample_rate: self
                .target_sample_rate
                .unwrap_or(audio::DEFAULT_SAMPLE_RATE),
            target_length: self
                .target_length
                .unwrap_or(Some(audio::DEFAULT_TARGET_LENGTH)),
            threshold_policy: self.threshold_policy.unwrap_or_default(),
        }
    }
}

/// Evaluation session for one scorer over one or more datasets.
pub struct EvalSession {
    config: EvalConfig,
    scorer: Box<dyn Scorer>,
}

impl EvalSession {
    /// Create a session with the given configuration and scorer.
    #[must_use]
    pub fn new(config: EvalConfig, scorer: Box<dyn Scorer>) -> Self {
        Self { config, scorer }
    }

    /// The configured scorer's name.
    #[must_use]
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Evaluate a single manifest.
    ///
    /// Per-example load failures are dropped (counted in `num_failed`), not
    /// fatal. Fails when the manifest cannot be read, the scorer errors, or
    /// nothing remains to hand to the metrics engine.
    pub fn evaluate_manifest(&self, name: &str, manifest_path: &Path) -> Result<DatasetReport> {
        let manifest = Manifest::load(manifest_path)?;
        let processor =
            WaveformProcessor::new(self.config.target_sample_rate, self.config.target_length);

        // Ordered parallel scoring: each chunk yields its rows in manifest
        // order and chunks are reassembled in order by collect.
        let chunk_results: Vec<Result<(Vec<ScoreRow>, usize)>> = manifest
            .entries
            .par_chunks(self.config.batch_size)
            .map(|chunk| self.score_chunk(chunk, &processor))
            .collect();

        let mut rows = Vec::with_capacity(manifest.len());
        let mut num_failed = 0;
        for result in chunk_results {
            let (chunk_rows, chunk_failed) = result?;
            rows.extend(chunk_rows);
            num_failed += chunk_failed;
        }

        let labels: Vec<i32> = rows.iter().map(|r| r.label).collect();
        let scores: Vec<f64> = rows.iter().map(|r| r.score).collect();
        let metrics = compute_metrics_with(&labels, &scores, self.config.threshold_policy)?;

        Ok(DatasetReport {
            name: name.to_string(),
            metrics,
            num_scored: rows.len(),
            num_failed,
            rows,
        })
    }

    /// Load, preprocess, and score one batch of manifest entries.
    ///
    /// Returns the scored rows for the entries that loaded, plus the count
    /// of entries that did not.
    fn score_chunk(
        &self,
        chunk: &[ManifestEntry],
        processor: &WaveformProcessor,
    ) -> Result<(Vec<ScoreRow>, usize)> {
        let mut waveforms = Vec::with_capacity(chunk.len());
        let mut labels = Vec::with_capacity(chunk.len());
        let mut failed = 0;

        for entry in chunk {
            match audio::load_wav(&entry.audio_path) {
                Ok((samples, rate)) => {
                    waveforms.push(processor.process(&samples, rate));
                    labels.push(entry.label);
                }
                Err(_) => failed += 1,
            }
        }

        if waveforms.is_empty() {
            return Ok((Vec::new(), failed));
        }

        let scores = self.scorer.score_batch(&waveforms)?;
        if scores.len() != waveforms.len() {
            return Err(Error::Scorer {
                name: self.scorer.name().to_string(),
                message: format!(
                    "returned {} scores for {} waveforms",
                    scores.len(),
                    waveforms.len()
                ),
            });
        }

        let rows = scores
            .into_iter()
            .zip(labels)
            .map(|(score, label)| ScoreRow { score, label })
            .collect();
        Ok((rows, failed))
    }

    /// Evaluate an ordered group of datasets.
    ///
    /// Each dataset is evaluated and its scores CSV written independently; a
    /// missing manifest or a dataset whose evaluation fails is recorded as
    /// skipped rather than aborting the group. The consolidated metrics YAML
    /// is written once all datasets are done.
    pub fn evaluate_group(&self, group_name: &str, specs: &[DatasetSpec]) -> Result<GroupReport> {
        std::fs::create_dir_all(&self.config.results_dir)?;
        let mut report = GroupReport::new(group_name.to_string());

        for spec in specs {
            if !spec.manifest_path.exists() {
                report.skipped.push(SkippedDataset {
                    name: spec.name.clone(),
                    reason: format!("manifest not found: {}", spec.manifest_path.display()),
                });
                continue;
            }
            match self.evaluate_manifest(&spec.name, &spec.manifest_path) {
                Ok(dataset) => {
                    self.write_scores_csv(&dataset)?;
                    report.datasets.push(dataset);
                }
                Err(e) => report.skipped.push(SkippedDataset {
                    name: spec.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        report.finalize();
        self.write_group_metrics(&report)?;
        Ok(report)
    }

    /// Write a dataset's per-example scores CSV (`score,label`).
    pub fn write_scores_csv(&self, report: &DatasetReport) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config.results_dir)?;
        let path = self.config.results_dir.join(format!(
            "{}_on_{}_scores.csv",
            self.scorer.name(),
            report.name
        ));

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["score", "label"])?;
        for row in &report.rows {
            writer.write_record([row.score.to_string(), row.label.to_string()])?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Write the consolidated metrics YAML for a group report.
    pub fn write_group_metrics(&self, report: &GroupReport) -> Result<PathBuf> {
        let path = self.config.results_dir.join(format!(
            "{}_on_{}_metrics.yaml",
            self.scorer.name(),
            report.name
        ));
        let yaml = report.metrics_yaml()?;
        std::fs::create_dir_all(&self.config.results_dir)
            .and_then(|()| std::fs::write(&path, yaml))
            .map_err(|e| Error::Report(format!("cannot write {}: {e}", path.display())))?;
        Ok(path)
    }

    /// Write the group report's LaTeX table to the given path.
    pub fn write_latex_table(&self, report: &GroupReport, path: &Path) -> Result<()> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, report.to_latex_table())
        };
        write().map_err(|e| Error::Report(format!("cannot write {}: {e}", path.display())))
    }
}
