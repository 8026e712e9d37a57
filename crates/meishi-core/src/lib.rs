//! # Meishi Core
//!
//! Building blocks of the meishi person-name tagger: corpus loading, sentence
//! segmentation, per-token feature extraction, a maximum-entropy classifier
//! and token-level metrics.
//!
//! ## Quick Start
//!
//! ```rust
//! use meishi_core::features::FeatureExtractor;
//! use meishi_core::types::Label;
//!
//! let extractor = FeatureExtractor::with_defaults().unwrap();
//! let tokens: Vec<String> = ["Dr", "Smith", "."].iter().map(|t| t.to_string()).collect();
//! let labels = vec![Label::outside(), Label::person(), Label::outside()];
//!
//! let mut features = Vec::new();
//! let mut targets = Vec::new();
//! extractor.extract(&tokens, &labels, &mut features, &mut targets).unwrap();
//!
//! assert!(features[1].is_set("honorific"));
//! assert_eq!(targets[1], Label::person());
//! ```
pub mod corpus;
pub mod error;
pub mod features;
pub mod maxent;
pub mod metrics;
pub mod types;

// Re-export primary API
pub use corpus::{flatten, load_corpus, segment, Sentence, TaggedCorpus};
pub use error::{MeishiError, Result};
pub use features::{FeatureExtractor, HeuristicPosTagger, NameGazetteer, NameList, PosTagger};
pub use maxent::{Classifier, GisTrainer, MaxentModel, ProbDist, Trainer};
pub use metrics::{ClassMetrics, EvaluationReport};
pub use types::{FeatureSet, FeatureValue, Label, TrainingExample};
