use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during Meishi core operations.
#[derive(Debug, Error)]
pub enum MeishiError {
    /// The corpus file is missing or is not readable as UTF-8 text.
    #[error("failed to read corpus {path:?}: {source}")]
    CorpusRead {
        /// Path of the corpus file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A token index fell outside the sentence, its tags or its label history.
    #[error("token index {index} out of range for sentence of length {len}")]
    FeatureIndex {
        /// The offending index.
        index: usize,
        /// Length of the sequence that was indexed.
        len: usize,
    },

    /// Two sequences that must run in parallel have different lengths.
    #[error("parallel sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Evaluation, inspection or saving was requested before a classifier
    /// was trained or loaded.
    #[error("no model loaded: train or load a classifier first")]
    NoModelLoaded,

    /// The model artifact could not be written, read or decoded.
    #[error("model artifact {path:?} unusable: {reason}")]
    Persistence {
        /// Path of the artifact.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A gazetteer list could not be read.
    #[error("failed to load resource {path:?}: {source}")]
    ResourceLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The split produced no sentences to train or evaluate on.
    #[error("split {path:?} contains no complete sentences")]
    EmptySplit { path: PathBuf },

    /// The trainer rejected its input.
    #[error("training error: {0}")]
    Training(String),

    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type alias for Meishi operations.
pub type Result<T> = std::result::Result<T, MeishiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = MeishiError::NoModelLoaded;
        assert_eq!(
            err.to_string(),
            "no model loaded: train or load a classifier first"
        );

        let err = MeishiError::FeatureIndex { index: 7, len: 5 };
        assert!(err.to_string().contains("index 7"));
        assert!(err.to_string().contains("length 5"));

        let err = MeishiError::Persistence {
            path: PathBuf::from("model.json"),
            reason: "truncated".into(),
        };
        assert!(err.to_string().contains("model.json"));
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeishiError>();
    }
}
