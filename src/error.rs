//! Error types for spoof-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for spoof-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during benchmark evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input handed to the metrics engine.
    #[error("Invalid metrics input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Failed to load or parse a manifest file.
    #[error("Manifest load failed: {path}: {reason}")]
    ManifestLoad {
        /// Path to the manifest that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to load or decode an audio file.
    #[error("Audio load failed: {path}: {reason}")]
    AudioLoad {
        /// Path to the audio file that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Error reported by a scorer implementation.
    #[error("Scorer error ({name}): {message}")]
    Scorer {
        /// Scorer identifier.
        name: String,
        /// Error message from the scorer.
        message: String,
    },

    /// Error in evaluation configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Error writing report files.
    #[error("Report error: {0}")]
    Report(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Convenience constructor for [`Error::InvalidInput`].
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
