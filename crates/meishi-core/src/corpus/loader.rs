//! # Corpus Loader
//!
//! Reads token-per-line tagged files of the form `<token>\t<label>[\t...]`.
//! Blank and malformed lines are skipped without complaint.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{MeishiError, Result};
use crate::types::Label;

/// A flat tagged corpus: tokens and labels in 1:1 correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedCorpus {
    pub tokens: Vec<String>,
    pub labels: Vec<Label>,
}

impl TaggedCorpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one (token, label) pair.
    pub fn push(&mut self, token: impl Into<String>, label: impl Into<Label>) {
        self.tokens.push(token.into());
        self.labels.push(label.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parses one corpus line into a (token, label) pair.
///
/// The line is trimmed first, so leading or trailing tabs do not produce
/// empty fields.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.trim().split('\t');
    let token = fields.next()?;
    let label = fields.next()?;
    Some((token, label))
}

/// Load a tagged corpus from `path`.
///
/// # Errors
///
/// Returns `MeishiError::CorpusRead` if the file cannot be opened or is not
/// valid UTF-8.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<TaggedCorpus> {
    let path = path.as_ref();
    let read_err = |source| MeishiError::CorpusRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let reader = BufReader::new(file);

    let mut corpus = TaggedCorpus::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line.map_err(read_err)?;
        match parse_line(&line) {
            Some((token, label)) => corpus.push(token, label),
            None => skipped += 1,
        }
    }

    debug!(
        path = %path.display(),
        pairs = corpus.len(),
        skipped,
        "loaded corpus"
    );

    Ok(corpus)
}
