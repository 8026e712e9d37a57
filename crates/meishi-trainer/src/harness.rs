//! # Training, Evaluation and Inspection
//!
//! A [`Harness`] owns the feature extractor, the trainer and the classifier
//! slot. Every pass runs the same pipeline: load a split, segment it into
//! sentences, extract one feature set per token, then train, classify or
//! inspect.

use std::ops::Range;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use meishi_core::corpus::{load_corpus, segment, Sentence};
use meishi_core::error::{MeishiError, Result};
use meishi_core::features::{FeatureExtractor, HeuristicPosTagger, NameList};
use meishi_core::maxent::{Classifier, GisTrainer, Trainer};
use meishi_core::metrics::EvaluationReport;
use meishi_core::types::{FeatureSet, Label, TrainingExample, OUTSIDE, PERSON};

use crate::config::{HarnessConfig, HistoryPolicy};
use crate::persistence;

/// Which corpus split to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Split {
    Train,
    Dev,
}

/// Class probabilities of one held-out token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionRow {
    pub token: String,
    pub gold: Label,
    pub p_person: f64,
    pub p_outside: f64,
}

/// Extracted features of one token, as written by the feature dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub index: usize,
    pub token: String,
    pub label: Label,
    pub features: FeatureSet,
}

/// Flat per-token view of a split, in corpus order.
struct ExtractedSplit {
    tokens: Vec<String>,
    features: Vec<FeatureSet>,
    targets: Vec<Label>,
}

/// Drives the MEMM pipeline over the configured splits.
pub struct Harness<T: Trainer = GisTrainer> {
    config: HarnessConfig,
    extractor: FeatureExtractor,
    trainer: T,
    classifier: Option<T::Model>,
}

impl Harness<GisTrainer> {
    /// Heuristic POS tagger, name lists from the configuration and a GIS
    /// trainer.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::ResourceLoad` if a configured name list cannot be
    /// read.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        if !config.has_name_lists() {
            warn!("no name lists configured; the dataset feature will never fire");
        }
        let gazetteer =
            NameList::from_files(config.first_names.as_deref(), config.last_names.as_deref())?;
        let extractor = FeatureExtractor::new(HeuristicPosTagger::new()?, gazetteer)?;

        let mut trainer = GisTrainer::new();
        if let Some(delta) = config.min_ll_delta {
            trainer = trainer.with_min_ll_delta(delta);
        }
        Ok(Self::with_parts(config, extractor, trainer))
    }
}

impl<T: Trainer> Harness<T> {
    pub fn with_parts(config: HarnessConfig, extractor: FeatureExtractor, trainer: T) -> Self {
        Self {
            config,
            extractor,
            trainer,
            classifier: None,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The current classifier, if one was trained or loaded.
    pub fn classifier(&self) -> Option<&T::Model> {
        self.classifier.as_ref()
    }

    fn split_path(&self, split: Split) -> &Path {
        match split {
            Split::Train => &self.config.train_path,
            Split::Dev => &self.config.dev_path,
        }
    }

    fn sentences(&self, split: Split) -> Result<Vec<Sentence>> {
        let path = self.split_path(split);
        let corpus = load_corpus(path)?;
        let sentences = segment(&corpus);
        debug!(
            path = %path.display(),
            tokens = corpus.len(),
            sentences = sentences.len(),
            "split segmented"
        );
        Ok(sentences)
    }

    fn non_empty_sentences(&self, split: Split) -> Result<Vec<Sentence>> {
        let sentences = self.sentences(split)?;
        if sentences.is_empty() {
            return Err(MeishiError::EmptySplit {
                path: self.split_path(split).to_path_buf(),
            });
        }
        Ok(sentences)
    }

    fn report_progress(&self, done: usize, total: usize) {
        let every = self.config.progress_every;
        if every > 0 && (done % every == 0 || done == total) {
            info!(done, total, "sentences processed");
        }
    }

    /// Gold-history features of every token, sentence by sentence.
    fn extract(&self, sentences: &[Sentence]) -> Result<ExtractedSplit> {
        let total_tokens = sentences.iter().map(Sentence::len).sum();
        let mut split = ExtractedSplit {
            tokens: Vec::with_capacity(total_tokens),
            features: Vec::with_capacity(total_tokens),
            targets: Vec::with_capacity(total_tokens),
        };

        for (i, sentence) in sentences.iter().enumerate() {
            self.extractor.extract(
                &sentence.tokens,
                &sentence.labels,
                &mut split.features,
                &mut split.targets,
            )?;
            split.tokens.extend(sentence.tokens.iter().cloned());
            self.report_progress(i + 1, sentences.len());
        }

        Ok(split)
    }

    fn model(&self) -> Result<&T::Model> {
        self.classifier.as_ref().ok_or(MeishiError::NoModelLoaded)
    }

    /// Train on the training split and store the classifier, replacing any
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::EmptySplit` if the split has no sentences, or
    /// any loader, extraction or trainer error.
    pub fn train(&mut self) -> Result<()> {
        info!(path = %self.config.train_path.display(), "training classifier");

        let sentences = self.non_empty_sentences(Split::Train)?;
        let split = self.extract(&sentences)?;
        let examples: Vec<TrainingExample> = split
            .features
            .into_iter()
            .zip(split.targets)
            .map(|(features, label)| TrainingExample::new(features, label))
            .collect();

        let model = self.trainer.train(&examples, self.config.max_iterations)?;
        self.classifier = Some(model);

        info!(
            sentences = sentences.len(),
            examples = examples.len(),
            "training complete"
        );
        Ok(())
    }

    /// Classify the held-out split and score it against the gold labels.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::NoModelLoaded` before [`train`](Self::train) or
    /// [`load_model`](Self::load_model), `MeishiError::EmptySplit` if the split
    /// has no sentences, and `MeishiError::Config` for an invalid beta.
    pub fn evaluate(&self) -> Result<EvaluationReport> {
        let model = self.model()?;
        info!(
            path = %self.config.dev_path.display(),
            history = %self.config.history,
            "testing classifier"
        );

        let sentences = self.non_empty_sentences(Split::Dev)?;
        let (gold, predicted) = match self.config.history {
            HistoryPolicy::Gold => {
                let split = self.extract(&sentences)?;
                let predicted = model.classify_many(&split.features);
                (split.targets, predicted)
            }
            HistoryPolicy::Predicted => self.decode(model, &sentences)?,
        };

        let report = EvaluationReport::compute(&gold, &predicted, self.config.beta)?;
        info!(
            tokens = gold.len(),
            f_score = report.f_score,
            accuracy = report.accuracy,
            "evaluation complete"
        );
        Ok(report)
    }

    /// Left-to-right decoding where `prev_label` is the model's own previous
    /// prediction.
    fn decode(&self, model: &T::Model, sentences: &[Sentence]) -> Result<(Vec<Label>, Vec<Label>)> {
        let mut gold = Vec::new();
        let mut predicted = Vec::new();

        for (i, sentence) in sentences.iter().enumerate() {
            let pos_tags = self.extractor.pos_tags(&sentence.tokens)?;
            let mut history: Vec<Label> = Vec::with_capacity(sentence.len());
            for index in 0..sentence.len() {
                let features =
                    self.extractor
                        .token_features(&sentence.tokens, &pos_tags, &history, index)?;
                history.push(model.classify(&features));
            }
            gold.extend(sentence.labels.iter().cloned());
            predicted.extend(history);
            self.report_progress(i + 1, sentences.len());
        }

        Ok((gold, predicted))
    }

    /// Class probabilities for held-out tokens `window.start..window.end`,
    /// clamped to the number of tokens. Uses gold history.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::NoModelLoaded` before a classifier exists.
    pub fn inspect(&self, window: Range<usize>) -> Result<Vec<InspectionRow>> {
        let model = self.model()?;
        let sentences = self.sentences(Split::Dev)?;
        let split = self.extract(&sentences)?;

        let end = window.end.min(split.features.len());
        let start = window.start.min(end);
        let dists = model.prob_classify_many(&split.features[start..end]);

        Ok(dists
            .into_iter()
            .zip(&split.tokens[start..end])
            .zip(&split.targets[start..end])
            .map(|((dist, token), gold)| InspectionRow {
                token: token.clone(),
                gold: gold.clone(),
                p_person: dist.prob(PERSON),
                p_outside: dist.prob(OUTSIDE),
            })
            .collect())
    }

    /// Gold-history features of every token of `split`, numbered in corpus
    /// order.
    pub fn feature_rows(&self, split: Split) -> Result<Vec<FeatureRow>> {
        let sentences = self.sentences(split)?;
        let extracted = self.extract(&sentences)?;

        Ok(extracted
            .tokens
            .into_iter()
            .zip(extracted.targets)
            .zip(extracted.features)
            .enumerate()
            .map(|(index, ((token, label), features))| FeatureRow {
                index,
                token,
                label,
                features,
            })
            .collect())
    }
}

impl<T> Harness<T>
where
    T: Trainer,
    T::Model: Serialize + DeserializeOwned,
{
    /// Write the classifier to the configured model path.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::NoModelLoaded` if there is nothing to save, or
    /// `MeishiError::Persistence` if writing fails.
    pub fn save_model(&self) -> Result<()> {
        persistence::save(self.model()?, &self.config.model_path)
    }

    /// Replace the classifier with the one stored at the configured model path.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::Persistence` if the artifact is missing or corrupt.
    pub fn load_model(&mut self) -> Result<()> {
        self.classifier = Some(persistence::load(&self.config.model_path)?);
        Ok(())
    }
}
