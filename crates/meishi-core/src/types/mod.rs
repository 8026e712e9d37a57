pub mod feature_set;
pub mod label;

pub use feature_set::{FeatureSet, FeatureValue, TrainingExample};
pub use label::{Label, OUTSIDE, PERSON};
