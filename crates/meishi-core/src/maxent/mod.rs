//! # Maximum-Entropy Classification
//!
//! The tagging pipeline only relies on the [`Trainer`] and [`Classifier`]
//! capabilities; [`GisTrainer`] is the implementation shipped with the crate.

pub mod encoding;
pub mod gis;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{FeatureSet, Label, TrainingExample};

pub use encoding::{FeatureEncoding, JointFeature};
pub use gis::{GisTrainer, MaxentModel};

/// Probability distribution over a classifier's labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbDist {
    entries: Vec<(Label, f64)>,
}

impl ProbDist {
    #[must_use]
    pub fn new(entries: Vec<(Label, f64)>) -> Self {
        Self { entries }
    }

    /// Probability of `label`; zero for labels the classifier never saw.
    #[must_use]
    pub fn prob(&self, label: &str) -> f64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Most probable label. Ties go to the label listed first.
    #[must_use]
    pub fn max(&self) -> Option<&Label> {
        let mut best: Option<&(Label, f64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|(_, p)| entry.1 > *p) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, f64)> {
        self.entries.iter().map(|(l, p)| (l, *p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A trained model that labels feature sets.
pub trait Classifier {
    /// Labels the model can emit, in its internal order.
    fn labels(&self) -> &[Label];

    /// Probability of every label given `features`.
    fn prob_classify(&self, features: &FeatureSet) -> ProbDist;

    /// Most probable label given `features`.
    fn classify(&self, features: &FeatureSet) -> Label {
        self.prob_classify(features)
            .max()
            .cloned()
            .unwrap_or_else(Label::outside)
    }

    fn prob_classify_many(&self, features: &[FeatureSet]) -> Vec<ProbDist> {
        features.iter().map(|fs| self.prob_classify(fs)).collect()
    }

    fn classify_many(&self, features: &[FeatureSet]) -> Vec<Label> {
        features.iter().map(|fs| self.classify(fs)).collect()
    }
}

/// Fits a [`Classifier`] to labelled feature sets.
pub trait Trainer {
    type Model: Classifier;

    /// Train on `examples`, running at most `max_iterations` optimizer steps.
    fn train(&self, examples: &[TrainingExample], max_iterations: usize) -> Result<Self::Model>;
}
