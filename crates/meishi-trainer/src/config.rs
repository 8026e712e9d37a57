//! Harness configuration.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Source of the `prev_label` feature when classifying held-out data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryPolicy {
    /// Previous token's gold label, exactly as in training.
    #[default]
    Gold,
    /// Classifier's own prediction for the previous token, decoded left to right.
    Predicted,
}

impl fmt::Display for HistoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::Predicted => write!(f, "predicted"),
        }
    }
}

/// Configuration for a [`Harness`](crate::Harness).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Tagged corpus used for training.
    pub train_path: PathBuf,
    /// Held-out tagged corpus used for evaluation and inspection.
    pub dev_path: PathBuf,
    /// Where the trained classifier is saved and loaded.
    pub model_path: PathBuf,
    /// Weight of recall in the F-score.
    pub beta: f64,
    /// Upper bound on optimizer iterations.
    pub max_iterations: usize,
    /// Stop training once the log-likelihood improves by no more than this.
    pub min_ll_delta: Option<f64>,
    pub history: HistoryPolicy,
    /// Emit a progress event every this many sentences (0 disables).
    pub progress_every: usize,
    pub first_names: Option<PathBuf>,
    pub last_names: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            train_path: PathBuf::from("data/train"),
            dev_path: PathBuf::from("data/dev"),
            model_path: PathBuf::from("model.json"),
            beta: 1.0,
            max_iterations: 10,
            min_ll_delta: None,
            history: HistoryPolicy::Gold,
            progress_every: 1000,
            first_names: None,
            last_names: None,
        }
    }
}

impl HarnessConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_train_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.train_path = path.into();
        self
    }

    pub fn with_dev_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dev_path = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Set the F-score beta. Validated when metrics are computed.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_min_ll_delta(mut self, delta: Option<f64>) -> Self {
        self.min_ll_delta = delta;
        self
    }

    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = history;
        self
    }

    pub fn with_progress_every(mut self, sentences: usize) -> Self {
        self.progress_every = sentences;
        self
    }

    /// Name lists backing the gazetteer.
    pub fn with_name_lists(mut self, first: Option<PathBuf>, last: Option<PathBuf>) -> Self {
        self.first_names = first;
        self.last_names = last;
        self
    }

    /// `true` if at least one name list is configured.
    pub fn has_name_lists(&self) -> bool {
        self.first_names.is_some() || self.last_names.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.train_path, PathBuf::from("data/train"));
        assert_eq!(config.dev_path, PathBuf::from("data/dev"));
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.history, HistoryPolicy::Gold);
        assert_eq!(config.beta, 1.0);
        assert_eq!(config.min_ll_delta, None);
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_train_path("a")
            .with_dev_path("b")
            .with_model_path("m.json")
            .with_beta(0.5)
            .with_max_iterations(3)
            .with_min_ll_delta(Some(1e-4))
            .with_history(HistoryPolicy::Predicted)
            .with_progress_every(0);

        assert_eq!(config.train_path, PathBuf::from("a"));
        assert_eq!(config.dev_path, PathBuf::from("b"));
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.beta, 0.5);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.min_ll_delta, Some(1e-4));
        assert_eq!(config.history, HistoryPolicy::Predicted);
        assert_eq!(config.progress_every, 0);
    }

    #[test]
    fn test_history_policy_display() {
        assert_eq!(HistoryPolicy::Gold.to_string(), "gold");
        assert_eq!(HistoryPolicy::Predicted.to_string(), "predicted");
    }

    #[test]
    fn test_has_name_lists() {
        let config = HarnessConfig::default();
        assert!(!config.has_name_lists());

        let config = config.with_name_lists(None, Some(PathBuf::from("last.txt")));
        assert!(config.has_name_lists());
    }
}
