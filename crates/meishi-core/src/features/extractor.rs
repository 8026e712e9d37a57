//! # Feature Extraction
//!
//! Turns each token of a sentence into a sparse [`FeatureSet`]:
//!
//! - `has_(<token>)`: word identity, always present
//! - `prev_label`: tag of the preceding token, `"O"` at sentence start
//! - `first_uppercase`: token matches `[A-Z]+[a-z]+$`
//! - `proper_noun`, `first_last`, `possession`: proper-noun context of a
//!   capitalized token
//! - `dataset`: capitalized token found in the name gazetteer
//! - `honorific`: preceding token is a title such as `Dr` or `Mrs.`

use regex::Regex;

use super::gazetteer::{NameGazetteer, NameList};
use super::pos::{HeuristicPosTagger, PosTag, PosTagger};
use crate::error::{MeishiError, Result};
use crate::types::{FeatureSet, FeatureValue, Label};

pub const PREV_LABEL: &str = "prev_label";
pub const FIRST_UPPERCASE: &str = "first_uppercase";
pub const PROPER_NOUN: &str = "proper_noun";
pub const FIRST_LAST: &str = "first_last";
pub const POSSESSION: &str = "possession";
pub const DATASET: &str = "dataset";
pub const HONORIFIC: &str = "honorific";

/// Token marking possession after a name, as in `Smith 's`.
pub const POSSESSIVE_MARKER: &str = "'s";

/// Titles that signal a following name. Compared after removing periods.
pub const HONORIFICS: &[&str] = &[
    "Mr", "Ms", "Miss", "Mrs", "Mx", "Master", "Sir", "Madam", "Dame", "Lord", "Lady", "Dr",
    "Prof", "Br", "Sr", "Fr", "Rev", "Pr", "Elder",
];

/// Name of the word-identity feature for `token`.
#[must_use]
pub fn word_feature(token: &str) -> String {
    format!("has_({token})")
}

/// Derives per-token feature sets from a sentence and its label history.
pub struct FeatureExtractor {
    tagger: Box<dyn PosTagger>,
    gazetteer: Box<dyn NameGazetteer>,
    re_capitalized: Regex,
}

impl FeatureExtractor {
    /// Creates an extractor backed by the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::RegexError` if the capitalization pattern fails
    /// to compile.
    pub fn new(
        tagger: impl PosTagger + 'static,
        gazetteer: impl NameGazetteer + 'static,
    ) -> Result<Self> {
        Ok(Self {
            tagger: Box::new(tagger),
            gazetteer: Box::new(gazetteer),
            re_capitalized: Regex::new(r"[A-Z]+[a-z]+$")?,
        })
    }

    /// Heuristic tagger and an empty gazetteer.
    pub fn with_defaults() -> Result<Self> {
        Self::new(HeuristicPosTagger::new()?, NameList::new())
    }

    /// `true` if some run of uppercase letters followed by lowercase letters
    /// ends the token.
    #[must_use]
    pub fn looks_capitalized(&self, token: &str) -> bool {
        self.re_capitalized.is_match(token)
    }

    /// Tag a sentence, checking that the tagger kept it aligned.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::LengthMismatch` if the tagger returned a different
    /// number of tags than there are tokens.
    pub fn pos_tags(&self, tokens: &[String]) -> Result<Vec<PosTag>> {
        let tagged = self.tagger.tag(tokens);
        if tagged.len() != tokens.len() {
            return Err(MeishiError::LengthMismatch {
                left: tokens.len(),
                right: tagged.len(),
            });
        }
        Ok(tagged.into_iter().map(|(_, tag)| tag).collect())
    }

    /// Features of the token at `index`.
    ///
    /// `history` holds the labels of the tokens before `index` (it may be
    /// longer); only `history[index - 1]` is consulted.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::FeatureIndex` if `index` is outside the sentence,
    /// `pos_tags` does not cover it, or `history` is too short.
    pub fn token_features(
        &self,
        tokens: &[String],
        pos_tags: &[PosTag],
        history: &[Label],
        index: usize,
    ) -> Result<FeatureSet> {
        let len = tokens.len();
        let word = tokens
            .get(index)
            .ok_or(MeishiError::FeatureIndex { index, len })?;

        let mut features = FeatureSet::new();
        features.set(word_feature(word));

        let prev_label = match index {
            0 => Label::outside(),
            _ => history
                .get(index - 1)
                .cloned()
                .ok_or(MeishiError::FeatureIndex {
                    index: index - 1,
                    len: history.len(),
                })?,
        };
        features.insert(PREV_LABEL, FeatureValue::from(&prev_label));

        if self.looks_capitalized(word) {
            features.set(FIRST_UPPERCASE);

            let pos = pos_tags.get(index).ok_or(MeishiError::FeatureIndex {
                index,
                len: pos_tags.len(),
            })?;
            if pos.is_proper_noun() {
                features.set(PROPER_NOUN);
                // The upper bound is unreachable, so this fires on sentence-initial tokens only.
                if index == 0 || index == len {
                    features.set(FIRST_LAST);
                }
                if tokens.get(index + 1).is_some_and(|next| next == POSSESSIVE_MARKER) {
                    features.set(POSSESSION);
                }
            }

            if self.gazetteer.is_known_name(word) {
                features.set(DATASET);
            }
        }

        if index > 0 {
            let previous = tokens[index - 1].replace('.', "");
            if HONORIFICS.contains(&previous.as_str()) {
                features.set(HONORIFIC);
            }
        }

        Ok(features)
    }

    /// Append one feature set and one target label per token of the sentence.
    ///
    /// `labels` supplies both the targets and the `prev_label` history.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::LengthMismatch` if `tokens` and `labels` differ in
    /// length, or any error from [`Self::token_features`].
    pub fn extract(
        &self,
        tokens: &[String],
        labels: &[Label],
        features: &mut Vec<FeatureSet>,
        targets: &mut Vec<Label>,
    ) -> Result<()> {
        if tokens.len() != labels.len() {
            return Err(MeishiError::LengthMismatch {
                left: tokens.len(),
                right: labels.len(),
            });
        }

        let pos_tags = self.pos_tags(tokens)?;
        features.reserve(tokens.len());
        targets.reserve(tokens.len());

        for (index, label) in labels.iter().enumerate() {
            features.push(self.token_features(tokens, &pos_tags, labels, index)?);
            targets.push(label.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn labs(tags: &[&str]) -> Vec<Label> {
        tags.iter().map(|t| Label::from(*t)).collect()
    }

    fn extract_all(extractor: &FeatureExtractor, words: &[&str], tags: &[&str]) -> Vec<FeatureSet> {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        extractor
            .extract(&toks(words), &labs(tags), &mut features, &mut targets)
            .unwrap();
        assert_eq!(targets, labs(tags));
        features
    }

    /// Tags every token with a fixed tag.
    struct ConstTagger(&'static str);

    impl PosTagger for ConstTagger {
        fn tag(&self, tokens: &[String]) -> Vec<(String, PosTag)> {
            tokens
                .iter()
                .map(|t| (t.clone(), PosTag::new(self.0)))
                .collect()
        }
    }

    /// Drops the last tag.
    struct ShortTagger;

    impl PosTagger for ShortTagger {
        fn tag(&self, tokens: &[String]) -> Vec<(String, PosTag)> {
            tokens
                .iter()
                .skip(1)
                .map(|t| (t.clone(), PosTag::new("NN")))
                .collect()
        }
    }

    #[test]
    fn test_capitalization_pattern() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        assert!(ex.looks_capitalized("Smith"));
        assert!(ex.looks_capitalized("McDonald"));
        assert!(ex.looks_capitalized("iPhone"));
        assert!(ex.looks_capitalized("ABCdef"));
        assert!(!ex.looks_capitalized("NASA"));
        assert!(!ex.looks_capitalized("smith"));
        assert!(!ex.looks_capitalized("Smith2"));
        assert!(!ex.looks_capitalized("A"));
        assert!(!ex.looks_capitalized("Émile"));
    }

    #[test]
    fn test_lowercase_sentence_is_sparse() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let features = extract_all(&ex, &["the", "cat", "sat", "."], &["O", "O", "O", "O"]);

        for (fs, word) in features.iter().zip(["the", "cat", "sat", "."]) {
            assert_eq!(fs.len(), 2);
            assert!(fs.is_set(&word_feature(word)));
            assert!(fs.contains(PREV_LABEL));
        }
    }

    #[test]
    fn test_prev_label_uses_supplied_history() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let features = extract_all(
            &ex,
            &["Jones", "said", "hi", "."],
            &["PERSON", "O", "O", "O"],
        );

        assert_eq!(
            features[0].get(PREV_LABEL),
            Some(&FeatureValue::Text("O".into()))
        );
        assert_eq!(
            features[1].get(PREV_LABEL),
            Some(&FeatureValue::Text("PERSON".into()))
        );
        assert_eq!(
            features[2].get(PREV_LABEL),
            Some(&FeatureValue::Text("O".into()))
        );
    }

    #[test]
    fn test_first_token_prev_label_is_outside_even_if_person() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let features = extract_all(&ex, &["Ann", "."], &["PERSON", "O"]);
        assert_eq!(
            features[0].get(PREV_LABEL),
            Some(&FeatureValue::Text("O".into()))
        );
    }

    #[test]
    fn test_honorific() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let features = extract_all(&ex, &["Dr", "Smith", "."], &["O", "PERSON", "O"]);
        assert!(features[1].is_set(HONORIFIC));
        assert!(!features[0].contains(HONORIFIC));
        assert!(!features[2].contains(HONORIFIC));

        let features = extract_all(&ex, &["Mrs.", "smith", "."], &["O", "O", "O"]);
        assert!(features[1].is_set(HONORIFIC));

        let features = extract_all(&ex, &["dr", "Smith", "."], &["O", "O", "O"]);
        assert!(!features[1].contains(HONORIFIC));
    }

    #[test]
    fn test_gazetteer_hit_sets_dataset() {
        let names = NameList::from_names(["Mary"], Vec::<String>::new());
        let ex = FeatureExtractor::new(HeuristicPosTagger::new().unwrap(), names).unwrap();

        let features = extract_all(&ex, &["Mary", "left", "."], &["PERSON", "O", "O"]);
        assert!(features[0].is_set(FIRST_UPPERCASE));
        assert!(features[0].is_set(DATASET));

        // Gazetteer only consulted for capitalized tokens.
        let features = extract_all(&ex, &["mary", "left", "."], &["O", "O", "O"]);
        assert!(!features[0].contains(DATASET));
    }

    #[test]
    fn test_proper_noun_block() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let features = extract_all(
            &ex,
            &["Smith", "met", "Jones", "'s", "dog", "."],
            &["PERSON", "O", "PERSON", "O", "O", "O"],
        );

        assert!(features[0].is_set(PROPER_NOUN));
        assert!(features[0].is_set(FIRST_LAST));
        assert!(!features[0].contains(POSSESSION));

        assert!(features[2].is_set(PROPER_NOUN));
        assert!(!features[2].contains(FIRST_LAST));
        assert!(features[2].is_set(POSSESSION));
    }

    #[test]
    fn test_non_proper_noun_skips_pos_block() {
        let ex = FeatureExtractor::new(ConstTagger("NN"), NameList::new()).unwrap();
        let features = extract_all(&ex, &["Smith", "'s", "."], &["PERSON", "O", "O"]);

        assert!(features[0].is_set(FIRST_UPPERCASE));
        assert!(!features[0].contains(PROPER_NOUN));
        assert!(!features[0].contains(FIRST_LAST));
        assert!(!features[0].contains(POSSESSION));
    }

    #[test]
    fn test_capitalized_last_token_has_no_possession() {
        let ex = FeatureExtractor::new(ConstTagger("NNP"), NameList::new()).unwrap();
        let features = extract_all(&ex, &["met", "Smith"], &["O", "PERSON"]);

        assert!(features[1].is_set(PROPER_NOUN));
        assert!(!features[1].contains(POSSESSION));
        assert!(!features[1].contains(FIRST_LAST));
    }

    #[test]
    fn test_accumulators_are_append_only() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let mut features = vec![FeatureSet::new()];
        let mut targets = vec![Label::new("SENTINEL")];

        ex.extract(&toks(&["a", "."]), &labs(&["O", "O"]), &mut features, &mut targets)
            .unwrap();
        ex.extract(&toks(&["b", "."]), &labs(&["O", "O"]), &mut features, &mut targets)
            .unwrap();

        assert_eq!(features.len(), 5);
        assert_eq!(targets[0], Label::new("SENTINEL"));
        assert!(features[3].is_set("has_(b)"));
    }

    #[test]
    fn test_length_mismatch() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let err = ex
            .extract(&toks(&["a", "."]), &labs(&["O"]), &mut Vec::new(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, MeishiError::LengthMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn test_misaligned_tagger() {
        let ex = FeatureExtractor::new(ShortTagger, NameList::new()).unwrap();
        let err = ex
            .extract(&toks(&["a", "."]), &labs(&["O", "O"]), &mut Vec::new(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, MeishiError::LengthMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn test_token_features_bounds() {
        let ex = FeatureExtractor::with_defaults().unwrap();
        let tokens = toks(&["a", "."]);
        let pos = ex.pos_tags(&tokens).unwrap();

        let err = ex.token_features(&tokens, &pos, &[], 2).unwrap_err();
        assert!(matches!(err, MeishiError::FeatureIndex { index: 2, len: 2 }));

        let err = ex.token_features(&tokens, &pos, &[], 1).unwrap_err();
        assert!(matches!(err, MeishiError::FeatureIndex { .. }));

        let fs = ex
            .token_features(&tokens, &pos, &[Label::person()], 1)
            .unwrap();
        assert_eq!(fs.get(PREV_LABEL), Some(&FeatureValue::Text("PERSON".into())));
    }
}
