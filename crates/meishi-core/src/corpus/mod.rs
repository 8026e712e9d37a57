pub mod loader;
pub mod segmenter;

pub use loader::{load_corpus, TaggedCorpus};
pub use segmenter::{flatten, segment, Sentence, SENTENCE_TERMINATOR};
