//! Evaluation-setup and dataset-group configuration.
//!
//! A run is driven by one YAML file with three sections:
//!
//! ```yaml
//! scorer:
//!   name: energy
//!   args: {}
//! data:
//!   group_name: speech_benchmarks
//!   groups_config_path: configs/dataset_groups.yaml
//! evaluation:
//!   results_dir: results
//!   batch_size: 16
//!   threshold_policy: eer
//! ```
//!
//! `data` names either a single `manifest_path` or a `group_name` resolved
//! through a groups file, which maps group names to ordered lists of
//! `{name, manifest_path}` entries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::eval::EvalConfig;
use crate::metrics::ThresholdPolicy;

/// One dataset in a group: a display name and its manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Dataset name used in reports and output filenames.
    pub name: String,
    /// Path to the manifest CSV.
    pub manifest_path: PathBuf,
}

/// Load a dataset-groups YAML file.
pub fn load_groups(path: impl AsRef<Path>) -> Result<HashMap<String, Vec<DatasetSpec>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("invalid groups file {}: {e}", path.display())))
}

/// The `scorer` section of an evaluation setup.
#[derive(Debug, Clone, Deserialize)]
pub struct ScorerSetup {
    /// Registry name of the scorer.
    pub name: String,
    /// Scorer-specific arguments, passed to the registry builder.
    #[serde(default)]
    pub args: serde_json::Value,
}

/// The `data` section: a single manifest or a named group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSetup {
    /// Single-dataset mode: path to one manifest.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
    /// Group mode: name of the group to evaluate.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Group mode: path to the dataset-groups YAML.
    #[serde(default)]
    pub groups_config_path: Option<PathBuf>,
}

/// The `evaluation` section: output and scoring settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalSettings {
    /// Directory for scores CSVs and the consolidated metrics file.
    pub results_dir: PathBuf,
    /// Number of waveforms scored per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Sample rate waveforms are resampled to.
    #[serde(default = "default_sample_rate")]
    pub target_sample_rate: u32,
    /// Fixed waveform length in samples; omit to keep native lengths.
    #[serde(default = "default_target_length")]
    pub target_length: Option<usize>,
    /// `eer` or a fixed numeric threshold.
    #[serde(default)]
    pub threshold_policy: ThresholdSetting,
    /// Where to write the LaTeX metrics table, if wanted.
    #[serde(default)]
    pub latex_output_path: Option<PathBuf>,
}

fn default_batch_size() -> usize {
    16
}

fn default_sample_rate() -> u32 {
    crate::audio::DEFAULT_SAMPLE_RATE
}

fn default_target_length() -> Option<usize> {
    Some(crate::audio::DEFAULT_TARGET_LENGTH)
}

/// Threshold policy as written in YAML: the string `eer` or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSetting {
    /// A named policy (`eer`).
    Named(String),
    /// A fixed numeric threshold.
    Fixed(f64),
}

impl Default for ThresholdSetting {
    fn default() -> Self {
        Self::Named("eer".to_string())
    }
}

impl ThresholdSetting {
    /// Convert to the engine's [`ThresholdPolicy`].
    pub fn to_policy(&self) -> Result<ThresholdPolicy> {
        match self {
            Self::Fixed(t) => Ok(ThresholdPolicy::Fixed(*t)),
            Self::Named(name) if name.eq_ignore_ascii_case("eer") => Ok(ThresholdPolicy::EerCut),
            Self::Named(name) => Err(Error::Config(format!(
                "unknown threshold_policy '{name}' (expected 'eer' or a number)"
            ))),
        }
    }
}

/// A full evaluation setup, loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalSetup {
    /// Scorer selection.
    pub scorer: ScorerSetup,
    /// What to evaluate.
    #[serde(default)]
    pub data: DataSetup,
    /// How to evaluate and where to write results.
    pub evaluation: EvalSettings,
}

impl EvalSetup {
    /// Load an evaluation setup from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let setup: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid setup {}: {e}", path.display())))?;
        setup.validate()?;
        Ok(setup)
    }

    fn validate(&self) -> Result<()> {
        match (&self.data.manifest_path, &self.data.group_name) {
            (None, None) => Err(Error::Config(
                "data section must set either manifest_path or group_name".to_string(),
            )),
            (Some(_), Some(_)) => Err(Error::Config(
                "data section must set manifest_path or group_name, not both".to_string(),
            )),
            (None, Some(_)) if self.data.groups_config_path.is_none() => Err(Error::Config(
                "group_name requires groups_config_path".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Name of the run: the group name, or the single manifest's stem.
    #[must_use]
    pub fn run_name(&self) -> String {
        if let Some(group) = &self.data.group_name {
            return group.clone();
        }
        self.data
            .manifest_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "run".to_string())
    }

    /// Resolve the ordered list of datasets to evaluate.
    pub fn resolve_datasets(&self) -> Result<Vec<DatasetSpec>> {
        if let Some(manifest_path) = &self.data.manifest_path {
            return Ok(vec![DatasetSpec {
                name: self.run_name(),
                manifest_path: manifest_path.clone(),
            }]);
        }

        let group_name = self.data.group_name.as_deref().expect("validated");
        let groups_path = self.data.groups_config_path.as_deref().expect("validated");
        let mut groups = load_groups(groups_path)?;
        groups.remove(group_name).ok_or_else(|| {
            Error::Config(format!(
                "dataset group '{group_name}' not found in {}",
                groups_path.display()
            ))
        })
    }

    /// Build the session [`EvalConfig`] from the `evaluation` section.
    pub fn eval_config(&self) -> Result<EvalConfig> {
        Ok(EvalConfig::builder()
            .results_dir(&self.evaluation.results_dir)
            .batch_size(self.evaluation.batch_size)
            .target_sample_rate(self.evaluation.target_sample_rate)
            .target_length(self.evaluation.target_length)
            .threshold_policy(self.evaluation.threshold_policy.to_policy()?)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_yaml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_setup_single_manifest() {
        let file = write_yaml(
            "scorer:\n  name: energy\ndata:\n  manifest_path: /data/itw.csv\nevaluation:\n  results_dir: results\n",
        );
        let setup = EvalSetup::load(file.path()).unwrap();

        assert_eq!(setup.scorer.name, "energy");
        assert_eq!(setup.run_name(), "itw");
        assert_eq!(setup.evaluation.batch_size, 16);
        assert!(matches!(
            setup.evaluation.threshold_policy.to_policy().unwrap(),
            ThresholdPolicy::EerCut
        ));

        let datasets = setup.resolve_datasets().unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].name, "itw");
    }

    #[test]
    fn test_load_setup_group() {
        let groups = write_yaml(
            "speech:\n  - name: asv21\n    manifest_path: /data/asv21.csv\n  - name: itw\n    manifest_path: /data/itw.csv\n",
        );
        let setup_yaml = format!(
            "scorer:\n  name: energy\ndata:\n  group_name: speech\n  groups_config_path: {}\nevaluation:\n  results_dir: results\n  threshold_policy: 0.5\n",
            groups.path().display()
        );
        let file = write_yaml(&setup_yaml);
        let setup = EvalSetup::load(file.path()).unwrap();

        let datasets = setup.resolve_datasets().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].name, "asv21");
        assert_eq!(datasets[1].name, "itw");
        assert!(matches!(
            setup.evaluation.threshold_policy.to_policy().unwrap(),
            ThresholdPolicy::Fixed(t) if t == 0.5
        ));
    }

    #[test]
    fn test_setup_requires_data_source() {
        let file = write_yaml("scorer:\n  name: energy\nevaluation:\n  results_dir: results\n");
        let err = EvalSetup::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_setup_rejects_both_sources() {
        let file = write_yaml(
            "scorer:\n  name: energy\ndata:\n  manifest_path: /a.csv\n  group_name: g\n  groups_config_path: /g.yaml\nevaluation:\n  results_dir: results\n",
        );
        assert!(EvalSetup::load(file.path()).is_err());
    }

    #[test]
    fn test_group_requires_groups_path() {
        let file = write_yaml(
            "scorer:\n  name: energy\ndata:\n  group_name: g\nevaluation:\n  results_dir: results\n",
        );
        assert!(EvalSetup::load(file.path()).is_err());
    }

    #[test]
    fn test_unknown_named_policy() {
        let setting = ThresholdSetting::Named("median".to_string());
        assert!(setting.to_policy().is_err());
    }

    #[test]
    fn test_missing_group_name() {
        let groups = write_yaml("speech:\n  - name: itw\n    manifest_path: /data/itw.csv\n");
        let setup_yaml = format!(
            "scorer:\n  name: energy\ndata:\n  group_name: nope\n  groups_config_path: {}\nevaluation:\n  results_dir: results\n",
            groups.path().display()
        );
        let file = write_yaml(&setup_yaml);
        let setup = EvalSetup::load(file.path()).unwrap();
        assert!(matches!(
            setup.resolve_datasets().unwrap_err(),
            Error::Config(_)
        ));
    }
}
