//! Token-level classification metrics.
//!
//! Precision, recall and F-beta are computed per class and macro-averaged
//! (unweighted mean over classes). A ratio whose denominator is zero counts
//! as `0`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{MeishiError, Result};
use crate::types::Label;

/// Metrics for a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: Label,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    /// Number of gold tokens carrying this class.
    pub support: usize,
}

/// Aggregate metrics of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub beta: f64,
    pub f_score: f64,
    pub accuracy: f64,
    pub recall: f64,
    pub precision: f64,
    /// Per-class breakdown, sorted by class name.
    pub classes: Vec<ClassMetrics>,
}

impl EvaluationReport {
    /// Compare `predicted` against `gold` position by position.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::LengthMismatch` if the sequences differ in length
    /// and `MeishiError::Config` if `beta` is negative or not finite.
    pub fn compute(gold: &[Label], predicted: &[Label], beta: f64) -> Result<Self> {
        if gold.len() != predicted.len() {
            return Err(MeishiError::LengthMismatch {
                left: gold.len(),
                right: predicted.len(),
            });
        }
        if !beta.is_finite() || beta.is_sign_negative() {
            return Err(MeishiError::Config(format!(
                "beta must be a non-negative finite number, got {beta}"
            )));
        }

        let classes: BTreeSet<&Label> = gold.iter().chain(predicted).collect();
        let beta2 = beta * beta;

        let per_class: Vec<ClassMetrics> = classes
            .into_iter()
            .map(|class| {
                let mut tp = 0usize;
                let mut fp = 0usize;
                let mut fn_ = 0usize;
                for (g, p) in gold.iter().zip(predicted) {
                    match (g == class, p == class) {
                        (true, true) => tp += 1,
                        (false, true) => fp += 1,
                        (true, false) => fn_ += 1,
                        (false, false) => {}
                    }
                }
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                ClassMetrics {
                    class: class.clone(),
                    precision,
                    recall,
                    f_score: f_beta(precision, recall, beta2),
                    support: tp + fn_,
                }
            })
            .collect();

        let correct = gold.iter().zip(predicted).filter(|(g, p)| g == p).count();

        Ok(Self {
            beta,
            f_score: macro_mean(&per_class, |c| c.f_score),
            accuracy: ratio(correct, gold.len()),
            recall: macro_mean(&per_class, |c| c.recall),
            precision: macro_mean(&per_class, |c| c.precision),
            classes: per_class,
        })
    }

    /// Metrics of one class, if it occurred in gold or predicted labels.
    #[must_use]
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.class == label)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f_beta(precision: f64, recall: f64, beta2: f64) -> f64 {
    let denom = beta2 * precision + recall;
    if denom == 0.0 {
        0.0
    } else {
        (1.0 + beta2) * precision * recall / denom
    }
}

fn macro_mean(classes: &[ClassMetrics], metric: impl Fn(&ClassMetrics) -> f64) -> f64 {
    if classes.is_empty() {
        return 0.0;
    }
    classes.iter().map(metric).sum::<f64>() / classes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(tags: &[&str]) -> Vec<Label> {
        tags.iter().map(|t| Label::from(*t)).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let gold = labels(&["O", "PERSON", "O", "O", "O"]);
        let report = EvaluationReport::compute(&gold, &gold, 1.0).unwrap();

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f_score, 1.0);

        let person = report.class("PERSON").unwrap();
        assert_eq!(person.precision, 1.0);
        assert_eq!(person.recall, 1.0);
        assert_eq!(person.support, 1);
    }

    #[test]
    fn test_macro_averages() {
        let gold = labels(&["PERSON", "PERSON", "O", "O"]);
        let pred = labels(&["PERSON", "O", "O", "PERSON"]);
        let report = EvaluationReport::compute(&gold, &pred, 1.0).unwrap();

        // Each class: tp=1, fp=1, fn=1.
        assert!(close(report.accuracy, 0.5));
        assert!(close(report.precision, 0.5));
        assert!(close(report.recall, 0.5));
        assert!(close(report.f_score, 0.5));
    }

    #[test]
    fn test_asymmetric_classes() {
        let gold = labels(&["PERSON", "O", "O", "O"]);
        let pred = labels(&["PERSON", "PERSON", "O", "O"]);
        let report = EvaluationReport::compute(&gold, &pred, 1.0).unwrap();

        let person = report.class("PERSON").unwrap();
        assert!(close(person.precision, 0.5));
        assert!(close(person.recall, 1.0));
        let outside = report.class("O").unwrap();
        assert!(close(outside.precision, 1.0));
        assert!(close(outside.recall, 2.0 / 3.0));

        assert!(close(report.precision, 0.75));
        assert!(close(report.recall, (1.0 + 2.0 / 3.0) / 2.0));
        assert!(close(report.accuracy, 0.75));
    }

    #[test]
    fn test_beta_zero_is_precision() {
        let gold = labels(&["PERSON", "O", "O", "O"]);
        let pred = labels(&["PERSON", "PERSON", "O", "O"]);
        let report = EvaluationReport::compute(&gold, &pred, 0.0).unwrap();
        assert!(close(report.f_score, report.precision));
    }

    #[test]
    fn test_class_never_predicted_scores_zero() {
        let gold = labels(&["PERSON", "O"]);
        let pred = labels(&["O", "O"]);
        let report = EvaluationReport::compute(&gold, &pred, 1.0).unwrap();

        let person = report.class("PERSON").unwrap();
        assert_eq!(person.precision, 0.0);
        assert_eq!(person.recall, 0.0);
        assert_eq!(person.f_score, 0.0);
    }

    #[test]
    fn test_classes_sorted() {
        let gold = labels(&["PERSON", "O"]);
        let report = EvaluationReport::compute(&gold, &gold, 1.0).unwrap();
        let names: Vec<&str> = report.classes.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(names, vec!["O", "PERSON"]);
    }

    #[test]
    fn test_invalid_input() {
        let gold = labels(&["O"]);
        assert!(matches!(
            EvaluationReport::compute(&gold, &[], 1.0),
            Err(MeishiError::LengthMismatch { .. })
        ));
        assert!(matches!(
            EvaluationReport::compute(&gold, &gold, -1.0),
            Err(MeishiError::Config(_))
        ));
        assert!(matches!(
            EvaluationReport::compute(&gold, &gold, f64::NAN),
            Err(MeishiError::Config(_))
        ));
    }
}
