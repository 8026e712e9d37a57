//! Generalized Iterative Scaling.
//!
//! Each (example, label) pair activates some joint features; a correction
//! feature tops every pair up to the same total `C`. Each iteration moves
//! every weight by `(ln empirical - ln estimated) / C`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::encoding::FeatureEncoding;
use super::{Classifier, ProbDist, Trainer};
use crate::error::{MeishiError, Result};
use crate::types::{FeatureSet, FeatureValue, Label, TrainingExample};

/// Trains [`MaxentModel`]s with Generalized Iterative Scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct GisTrainer {
    min_ll_delta: Option<f64>,
}

impl GisTrainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop early once the mean log-likelihood improves by no more than
    /// `delta` between iterations.
    #[must_use]
    pub fn with_min_ll_delta(mut self, delta: f64) -> Self {
        self.min_ll_delta = Some(delta.abs());
        self
    }
}

/// A trained maximum-entropy model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelRecord", into = "ModelRecord")]
pub struct MaxentModel {
    labels: Vec<Label>,
    encoding: FeatureEncoding,
    /// One weight per joint feature, then the correction weight.
    weights: Vec<f64>,
    correction_bound: f64,
}

#[derive(Serialize, Deserialize)]
struct ModelRecord {
    labels: Vec<Label>,
    features: FeatureEncoding,
    weights: Vec<f64>,
    correction_bound: f64,
}

impl TryFrom<ModelRecord> for MaxentModel {
    type Error = String;

    fn try_from(record: ModelRecord) -> std::result::Result<Self, Self::Error> {
        if record.weights.len() != record.features.len() + 1 {
            return Err(format!(
                "expected {} weights, found {}",
                record.features.len() + 1,
                record.weights.len()
            ));
        }
        if let Some(bad) = record.features.iter().find(|f| f.label >= record.labels.len()) {
            return Err(format!(
                "feature {:?} refers to label {} of {}",
                bad.name,
                bad.label,
                record.labels.len()
            ));
        }
        if record.correction_bound.is_nan() || record.correction_bound < 1.0 {
            return Err(format!(
                "correction bound must be at least 1, found {}",
                record.correction_bound
            ));
        }
        Ok(Self {
            labels: record.labels,
            encoding: record.features,
            weights: record.weights,
            correction_bound: record.correction_bound,
        })
    }
}

impl From<MaxentModel> for ModelRecord {
    fn from(model: MaxentModel) -> Self {
        Self {
            labels: model.labels,
            features: model.encoding,
            weights: model.weights,
            correction_bound: model.correction_bound,
        }
    }
}

impl MaxentModel {
    fn correction_id(&self) -> usize {
        self.weights.len() - 1
    }

    fn correction_value(&self, active: usize) -> f64 {
        (self.correction_bound - active as f64).max(0.0)
    }

    /// Label probabilities for pre-encoded active features.
    fn distribution(&self, active: &[Vec<usize>]) -> Vec<f64> {
        let correction = self.weights[self.correction_id()];
        let scores: Vec<f64> = active
            .iter()
            .map(|ids| {
                ids.iter().map(|&id| self.weights[id]).sum::<f64>()
                    + self.correction_value(ids.len()) * correction
            })
            .collect();
        softmax(&scores)
    }

    /// Weight of a joint feature, if the model knows it.
    #[must_use]
    pub fn weight(&self, name: &str, value: &FeatureValue, label: &str) -> Option<f64> {
        let label = self.labels.iter().position(|l| l == label)?;
        self.encoding
            .id(name, value, label)
            .map(|id| self.weights[id])
    }

    /// Number of joint features.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.encoding.len()
    }

    /// The `n` joint features with the largest absolute weight, heaviest first.
    #[must_use]
    pub fn most_informative(&self, n: usize) -> Vec<(String, Label, f64)> {
        let mut ranked: Vec<(String, Label, f64)> = self
            .encoding
            .iter()
            .zip(&self.weights)
            .map(|(f, w)| {
                (
                    format!("{}=={}", f.name, f.value),
                    self.labels[f.label].clone(),
                    *w,
                )
            })
            .collect();
        ranked.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

impl Classifier for MaxentModel {
    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn prob_classify(&self, features: &FeatureSet) -> ProbDist {
        let active = self.encoding.encode(features, self.labels.len());
        let probs = self.distribution(&active);
        ProbDist::new(self.labels.iter().cloned().zip(probs).collect())
    }
}

impl Trainer for GisTrainer {
    type Model = MaxentModel;

    fn train(&self, examples: &[TrainingExample], max_iterations: usize) -> Result<MaxentModel> {
        if examples.is_empty() {
            return Err(MeishiError::Training("no training examples".into()));
        }

        let mut labels: Vec<Label> = Vec::new();
        let mut label_ids: HashMap<&Label, usize> = HashMap::new();
        let mut gold = Vec::with_capacity(examples.len());
        for example in examples {
            let id = *label_ids.entry(&example.label).or_insert_with(|| {
                labels.push(example.label.clone());
                labels.len() - 1
            });
            gold.push(id);
        }

        let mut encoding = FeatureEncoding::new();
        for (example, &label) in examples.iter().zip(&gold) {
            encoding.observe(&example.features, label);
        }

        let encoded: Vec<Vec<Vec<usize>>> = examples
            .iter()
            .map(|ex| encoding.encode(&ex.features, labels.len()))
            .collect();

        let correction_bound = encoded
            .iter()
            .flatten()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        let num_weights = encoding.len() + 1;
        let correction = num_weights - 1;

        let mut empirical = vec![0.0f64; num_weights];
        for (active, &label) in encoded.iter().zip(&gold) {
            for &id in &active[label] {
                empirical[id] += 1.0;
            }
            empirical[correction] += correction_bound - active[label].len() as f64;
        }

        info!(
            examples = examples.len(),
            labels = labels.len(),
            features = encoding.len(),
            correction_bound,
            "training maxent classifier with GIS"
        );

        let mut model = MaxentModel {
            labels,
            encoding,
            weights: vec![0.0; num_weights],
            correction_bound,
        };

        let mut previous_ll: Option<f64> = None;
        for iteration in 1..=max_iterations.max(1) {
            let mut estimated = vec![0.0f64; num_weights];
            let mut log_likelihood = 0.0;
            let mut correct = 0usize;

            for (active, &label) in encoded.iter().zip(&gold) {
                let probs = model.distribution(active);
                log_likelihood += probs[label].max(f64::MIN_POSITIVE).ln();
                if argmax(&probs) == Some(label) {
                    correct += 1;
                }
                for (ids, &p) in active.iter().zip(&probs) {
                    for &id in ids {
                        estimated[id] += p;
                    }
                    estimated[correction] += p * model.correction_value(ids.len());
                }
            }

            log_likelihood /= examples.len() as f64;
            let accuracy = correct as f64 / examples.len() as f64;
            debug!(iteration, log_likelihood, accuracy, "gis iteration");

            if let (Some(delta), Some(previous)) = (self.min_ll_delta, previous_ll) {
                if (log_likelihood - previous).abs() <= delta {
                    debug!(iteration, "log-likelihood converged");
                    break;
                }
            }
            previous_ll = Some(log_likelihood);

            for ((weight, &emp), &est) in model.weights.iter_mut().zip(&empirical).zip(&estimated) {
                if emp > 0.0 && est > 0.0 {
                    *weight += (emp.ln() - est.ln()) / correction_bound;
                }
            }
        }

        Ok(model)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|b| v > values[b]) {
            best = Some(i);
        }
    }
    best
}
