//! # spoof-eval
//!
//! Audio deepfake detection benchmarking library.
//!
//! This library runs a detection scorer over labeled audio manifests and
//! reports detection-quality metrics: equal error rate (EER), AUC, accuracy,
//! and the per-class rates TPR/TNR. Scorers are a capability interface —
//! external crates provide the model, this library handles manifests,
//! waveform preprocessing, metrics, and report generation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spoof_eval::{EvalConfig, EvalSession, FnScorer};
//!
//! let config = EvalConfig::builder()
//!     .results_dir("./results")
//!     .batch_size(16)
//!     .build();
//!
//! let scorer = Box::new(FnScorer::new("my-detector", Box::new(|batch| {
//!     // Your model inference here, one score per waveform
//!     Ok(batch.iter().map(|_| 0.0).collect())
//! })));
//!
//! let session = EvalSession::new(config, scorer);
//! let report = session.evaluate_manifest("in_the_wild", "itw.csv".as_ref())?;
//! println!("EER: {:.2}%", report.metrics.eer * 100.0);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`metrics`]: Detection metrics (EER, AUC, accuracy, TPR/TNR)
//! - [`manifest`]: Manifest CSV loading
//! - [`audio`]: WAV loading and waveform preprocessing
//! - [`scorer`]: Scorer capability interface and registry
//! - [`eval`]: Evaluation session and report generation
//! - [`config`]: YAML evaluation-setup and dataset-group configs

pub mod audio;
pub mod config;
pub mod error;
pub mod eval;
pub mod manifest;
pub mod metrics;
pub mod scorer;

// Re-export commonly used types
pub use audio::WaveformProcessor;
pub use config::{DatasetSpec, EvalSetup};
pub use error::{Error, Result};
pub use eval::{
    report::{DatasetReport, GroupReport, ScoreRow},
    session::{EvalConfig, EvalSession},
};
pub use manifest::{Manifest, ManifestEntry};
pub use metrics::{compute_metrics, compute_metrics_with, MetricResult, ThresholdPolicy};
pub use scorer::{DetectorWrapper, FnScorer, RawScorer, Scorer, ScorerRegistry};
