//! Scorer capability interface.
//!
//! A [`Scorer`] maps a batch of preprocessed waveforms to one real-valued
//! score per waveform, higher meaning more spoof-like. Scores are raw model
//! outputs, not probabilities; the metrics engine never assumes a bounded
//! range.
//!
//! Implementations are selected at configuration time through a
//! [`ScorerRegistry`] rather than loaded from arbitrary code paths, and a
//! multi-output model is adapted by [`DetectorWrapper`], which owns the raw
//! model and reduces each output row to a single score.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A detection scorer: one score per waveform, higher = more spoof-like.
pub trait Scorer: Send + Sync {
    /// Identifier used in reports and error messages.
    fn name(&self) -> &str;

    /// Score a batch of waveforms. Must return exactly one score per input,
    /// in input order.
    fn score_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>>;
}

impl std::fmt::Debug for dyn Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer").field("name", &self.name()).finish()
    }
}

/// Scoring callback type for closure-based scorers.
pub type ScoreFn = Box<dyn Fn(&[Vec<f32>]) -> Result<Vec<f64>> + Send + Sync>;

/// Adapter turning a closure into a [`Scorer`].
pub struct FnScorer {
    name: String,
    score: ScoreFn,
}

impl FnScorer {
    /// Wrap a scoring closure under the given name.
    #[must_use]
    pub fn new(name: &str, score: ScoreFn) -> Self {
        Self {
            name: name.to_string(),
            score,
        }
    }
}

impl Scorer for FnScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn score_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
        (self.score)(batch)
    }
}

/// A raw model producing an output row (e.g. class logits) per waveform.
///
/// Wrap with [`DetectorWrapper`] to obtain a [`Scorer`].
pub trait RawScorer: Send + Sync {
    /// Identifier used in reports and error messages.
    fn name(&self) -> &str;

    /// Run the model, returning one output row per input waveform.
    fn forward(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f64>>>;
}

/// Reduces a raw model's output rows to single detection scores.
///
/// When a row has two or more outputs, the second entry is taken as the
/// spoof-class score; a single-output row is used as-is. The wrapper owns
/// the raw model it adapts.
pub struct DetectorWrapper {
    inner: Box<dyn RawScorer>,
}

impl DetectorWrapper {
    /// Wrap a raw model.
    #[must_use]
    pub fn new(inner: Box<dyn RawScorer>) -> Self {
        Self { inner }
    }
}

impl Scorer for DetectorWrapper {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn score_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
        let rows = self.inner.forward(batch)?;
        rows.into_iter()
            .map(|row| match row.len() {
                0 => Err(Error::Scorer {
                    name: self.inner.name().to_string(),
                    message: "model produced an empty output row".to_string(),
                }),
                1 => Ok(row[0]),
                _ => Ok(row[1]),
            })
            .collect()
    }
}

/// Naive baseline: mean squared amplitude.
///
/// Not a real detector; exists so the pipeline can be exercised end to end
/// without model weights.
#[derive(Debug, Default)]
pub struct EnergyScorer;

impl Scorer for EnergyScorer {
    fn name(&self) -> &str {
        "energy"
    }

    fn score_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
        Ok(batch
            .iter()
            .map(|waveform| {
                if waveform.is_empty() {
                    return 0.0;
                }
                waveform.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>()
                    / waveform.len() as f64
            })
            .collect())
    }
}

/// Naive baseline: zero-crossing rate.
#[derive(Debug, Default)]
pub struct ZeroCrossingScorer;

impl Scorer for ZeroCrossingScorer {
    fn name(&self) -> &str {
        "zero_crossing"
    }

    fn score_batch(&self, batch: &[Vec<f32>]) -> Result<Vec<f64>> {
        Ok(batch
            .iter()
            .map(|waveform| {
                if waveform.len() < 2 {
                    return 0.0;
                }
                let crossings = waveform
                    .windows(2)
                    .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
                    .count();
                crossings as f64 / (waveform.len() - 1) as f64
            })
            .collect())
    }
}

/// Builder callback for registry entries. Receives scorer-specific args from
/// the evaluation config.
pub type ScorerBuilder = Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn Scorer>> + Send + Sync>;

/// Registry mapping scorer names to builders.
///
/// This replaces loading model classes from arbitrary file paths: every
/// scorer available to a run is registered up front, and the config selects
/// one by name.
#[derive(Default)]
pub struct ScorerRegistry {
    builders: HashMap<String, ScorerBuilder>,
}

impl ScorerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in baseline scorers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("energy", Box::new(|_| Ok(Box::new(EnergyScorer))));
        registry.register(
            "zero_crossing",
            Box::new(|_| Ok(Box::new(ZeroCrossingScorer))),
        );
        registry
    }

    /// Register a scorer builder under a name.
    pub fn register(&mut self, name: &str, builder: ScorerBuilder) -> &mut Self {
        self.builders.insert(name.to_string(), builder);
        self
    }

    /// Registered scorer names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a scorer by name with the given args.
    pub fn build(&self, name: &str, args: &serde_json::Value) -> Result<Box<dyn Scorer>> {
        let builder = self.builders.get(name).ok_or_else(|| Error::Scorer {
            name: name.to_string(),
            message: format!("not registered (available: {})", self.names().join(", ")),
        })?;
        builder(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_scorer() {
        let scorer = EnergyScorer;
        let scores = scorer
            .score_batch(&[vec![0.5, -0.5], vec![0.0, 0.0], vec![]])
            .unwrap();
        assert!((scores[0] - 0.25).abs() < 1e-9);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_zero_crossing_scorer() {
        let scorer = ZeroCrossingScorer;
        let scores = scorer
            .score_batch(&[vec![1.0, -1.0, 1.0, -1.0], vec![1.0, 1.0, 1.0]])
            .unwrap();
        assert_eq!(scores[0], 1.0);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_detector_wrapper_reduces_rows() {
        struct TwoLogit;
        impl RawScorer for TwoLogit {
            fn name(&self) -> &str {
                "two_logit"
            }
            fn forward(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f64>>> {
                Ok(batch.iter().map(|_| vec![0.2, 0.8]).collect())
            }
        }

        let scorer = DetectorWrapper::new(Box::new(TwoLogit));
        let scores = scorer.score_batch(&[vec![0.0; 4], vec![0.0; 4]]).unwrap();
        assert_eq!(scores, vec![0.8, 0.8]);
        assert_eq!(scorer.name(), "two_logit");
    }

    #[test]
    fn test_detector_wrapper_single_output() {
        struct OneLogit;
        impl RawScorer for OneLogit {
            fn name(&self) -> &str {
                "one_logit"
            }
            fn forward(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f64>>> {
                Ok(batch.iter().map(|_| vec![0.4]).collect())
            }
        }

        let scorer = DetectorWrapper::new(Box::new(OneLogit));
        assert_eq!(scorer.score_batch(&[vec![0.0; 4]]).unwrap(), vec![0.4]);
    }

    #[test]
    fn test_registry_builds_builtins() {
        let registry = ScorerRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["energy", "zero_crossing"]);

        let scorer = registry.build("energy", &serde_json::Value::Null).unwrap();
        assert_eq!(scorer.name(), "energy");
    }

    #[test]
    fn test_registry_unknown_name() {
        let registry = ScorerRegistry::with_builtins();
        let err = registry
            .build("wavlm", &serde_json::Value::Null)
            .unwrap_err();
        assert!(matches!(err, Error::Scorer { .. }));
    }

    #[test]
    fn test_fn_scorer() {
        let scorer = FnScorer::new(
            "constant",
            Box::new(|batch| Ok(vec![0.5; batch.len()])),
        );
        assert_eq!(scorer.score_batch(&[vec![], vec![]]).unwrap(), vec![0.5, 0.5]);
    }
}
