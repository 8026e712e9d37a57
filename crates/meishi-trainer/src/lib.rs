//! # Meishi Trainer
//!
//! Training, evaluation and inspection workflows for the meishi MEMM
//! person-name tagger, plus JSON model persistence and console reports.
//! The `meishi` binary wires these to a command line.

pub mod config;
pub mod harness;
pub mod persistence;
pub mod report;

pub use config::{HarnessConfig, HistoryPolicy};
pub use harness::{FeatureRow, Harness, InspectionRow, Split};
pub use report::{render_inspection, render_metrics};
