//! Manifest CSV loading.
//!
//! A manifest enumerates audio files and their ground-truth labels, one row
//! per example. The loader is tolerant about column naming since manifests
//! come from many dataset-preparation tools: the path column may be called
//! `audio_path`, `wav_path`, `path`, `file`, or `filename`, and the label
//! column holds either the string `bonafide` / a spoof-method name or an
//! already-numeric 0/1. Any extra columns are carried through untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One row of a manifest.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    /// Path to the audio file.
    pub audio_path: PathBuf,
    /// Ground-truth label: 0 = bonafide, 1 = spoof.
    pub label: i32,
    /// Extra descriptive columns, passed through untouched.
    pub extra: HashMap<String, String>,
}

/// A loaded manifest: the ordered list of entries plus where it came from.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Manifest file path.
    pub path: PathBuf,
    /// Entries in file order.
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load a manifest from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| Error::ManifestLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::ManifestLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .iter()
            .map(String::from)
            .collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

        let path_idx = find_column(&header_refs, &["audio_path", "wav_path", "path", "file", "filename"])
            .ok_or_else(|| Error::ManifestLoad {
                path: path.to_path_buf(),
                reason: "could not find audio_path/wav_path column".to_string(),
            })?;
        let label_idx =
            find_column(&header_refs, &["label", "target", "class"]).ok_or_else(|| {
                Error::ManifestLoad {
                    path: path.to_path_buf(),
                    reason: "could not find label column".to_string(),
                }
            })?;

        let mut entries = Vec::new();
        for (line_num, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::ManifestLoad {
                path: path.to_path_buf(),
                // +2 for 1-based numbering and the header row
                reason: format!("line {}: {}", line_num + 2, e),
            })?;

            let audio_path = record.get(path_idx).unwrap_or("");
            if audio_path.is_empty() {
                continue;
            }
            let label = parse_label(record.get(label_idx).unwrap_or(""));

            let extra: HashMap<String, String> = headers
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != path_idx && i != label_idx)
                .filter_map(|(i, name)| record.get(i).map(|v| (name.clone(), v.to_string())))
                .collect();

            entries.push(ManifestEntry {
                audio_path: PathBuf::from(audio_path),
                label,
                extra,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of `(bonafide, spoof)` entries.
    #[must_use]
    pub fn class_counts(&self) -> (usize, usize) {
        let spoof = self.entries.iter().filter(|e| e.label == 1).count();
        (self.entries.len() - spoof, spoof)
    }
}

/// Map a raw label cell to 0/1: `bonafide` is the negative class, a numeric
/// 0 or 1 passes through, and any other value (spoof method names etc.) is
/// the positive class.
fn parse_label(raw: &str) -> i32 {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("bonafide") {
        return 0;
    }
    match raw.parse::<i32>() {
        Ok(0) => 0,
        Ok(1) => 1,
        _ => 1,
    }
}

/// Find a header index by any of the given names (case-insensitive).
fn find_column(headers: &[&str], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
}
