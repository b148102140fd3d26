//! Evaluation session and report generation.
//!
//! [`session::EvalSession`] drives a [`crate::scorer::Scorer`] over one or
//! more manifests and produces the report types in [`report`].

pub mod report;
pub mod session;

pub use report::{DatasetReport, GroupReport, ScoreRow, SkippedDataset};
pub use session::{EvalConfig, EvalConfigBuilder, EvalSession};
