//! # Meishi
//!
//! Person-name tagging with a maximum-entropy Markov model.
//!
//! [`meishi_core`] holds the tagging pipeline (corpus, features, classifier,
//! metrics); [`meishi_trainer`] drives it over tagged corpus splits.
//!
//! ```no_run
//! use meishi::{Harness, HarnessConfig};
//!
//! let mut harness = Harness::new(HarnessConfig::default())?;
//! harness.train()?;
//! let report = harness.evaluate()?;
//! println!("{}", meishi::meishi_trainer::render_metrics(&report));
//! # Ok::<(), meishi::MeishiError>(())
//! ```

pub use meishi_core;
pub use meishi_trainer;

pub use meishi_core::{EvaluationReport, Label, MeishiError, Result};
pub use meishi_trainer::{Harness, HarnessConfig, HistoryPolicy};
