//! # Sentence Segmenter
//!
//! Splits a flat tagged corpus into sentences at every `"."` token. The
//! terminator stays with the sentence it closes.

use tracing::debug;

use super::loader::TaggedCorpus;
use crate::types::Label;

/// Token that closes a sentence.
pub const SENTENCE_TERMINATOR: &str = ".";

/// A terminated sentence with its parallel label sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<String>,
    pub labels: Vec<Label>,
}

impl Sentence {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Partition `corpus` into sentences.
///
/// Tokens after the last terminator never form a sentence and are dropped.
pub fn segment(corpus: &TaggedCorpus) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for (i, token) in corpus.tokens.iter().enumerate() {
        if token == SENTENCE_TERMINATOR {
            sentences.push(Sentence {
                tokens: corpus.tokens[start..=i].to_vec(),
                labels: corpus.labels[start..=i].to_vec(),
            });
            start = i + 1;
        }
    }

    let dropped = corpus.len() - start;
    if dropped > 0 {
        debug!(dropped, "dropping unterminated trailing tokens");
    }

    sentences
}

/// Concatenate sentences back into a flat corpus.
pub fn flatten(sentences: &[Sentence]) -> TaggedCorpus {
    let mut corpus = TaggedCorpus::new();
    for sentence in sentences {
        corpus.tokens.extend(sentence.tokens.iter().cloned());
        corpus.labels.extend(sentence.labels.iter().cloned());
    }
    corpus
}
