pub mod extractor;
pub mod gazetteer;
pub mod pos;

pub use extractor::{word_feature, FeatureExtractor, HONORIFICS};
pub use gazetteer::{NameGazetteer, NameList};
pub use pos::{HeuristicPosTagger, PosTag, PosTagger};
