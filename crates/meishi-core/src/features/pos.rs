//! # Part-of-Speech Tagging
//!
//! The feature extractor only needs to know whether a token is a proper noun,
//! so the tagger is a narrow capability. [`HeuristicPosTagger`] fills it with
//! Penn Treebank tags derived from a closed-class lexicon, orthography and
//! suffix rules.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A Penn Treebank part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosTag(String);

impl PosTag {
    /// Singular proper noun.
    pub const PROPER_NOUN: &'static str = "NNP";

    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_proper_noun(&self) -> bool {
        self.0 == Self::PROPER_NOUN
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assigns a part-of-speech tag to every token of a sentence.
pub trait PosTagger {
    /// Tag `tokens`, returning one `(token, tag)` pair per input token in the
    /// same order.
    fn tag(&self, tokens: &[String]) -> Vec<(String, PosTag)>;
}

/// Closed-class words and frequent verbs, keyed by lowercase form.
const LEXICON: &[(&str, &str)] = &[
    ("a", "DT"),
    ("an", "DT"),
    ("the", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("every", "DT"),
    ("some", "DT"),
    ("no", "DT"),
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("him", "PRP"),
    ("her", "PRP$"),
    ("them", "PRP"),
    ("me", "PRP"),
    ("us", "PRP"),
    ("his", "PRP$"),
    ("its", "PRP$"),
    ("their", "PRP$"),
    ("our", "PRP$"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("of", "IN"),
    ("by", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("about", "IN"),
    ("into", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("during", "IN"),
    ("as", "IN"),
    ("if", "IN"),
    ("because", "IN"),
    ("than", "IN"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("to", "TO"),
    ("not", "RB"),
    ("very", "RB"),
    ("also", "RB"),
    ("is", "VBZ"),
    ("has", "VBZ"),
    ("does", "VBZ"),
    ("says", "VBZ"),
    ("are", "VBP"),
    ("am", "VBP"),
    ("have", "VBP"),
    ("do", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("had", "VBD"),
    ("did", "VBD"),
    ("said", "VBD"),
    ("told", "VBD"),
    ("went", "VBD"),
    ("made", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("will", "MD"),
    ("would", "MD"),
    ("can", "MD"),
    ("could", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("who", "WP"),
    ("what", "WP"),
    ("which", "WDT"),
    ("when", "WRB"),
    ("where", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
    ("there", "EX"),
    ("hello", "UH"),
    ("yes", "UH"),
];

/// Rule-based Penn Treebank tagger.
///
/// Rules are tried in order: punctuation, the possessive marker, numbers,
/// the closed-class lexicon, capitalization (`NNP`) and finally suffixes.
pub struct HeuristicPosTagger {
    lexicon: HashMap<String, &'static str>,
    re_number: Regex,
    re_capitalized: Regex,
    re_punct: Regex,
}

impl HeuristicPosTagger {
    /// Constructs a tagger with pre-compiled patterns.
    ///
    /// # Errors
    ///
    /// Returns `MeishiError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            lexicon: LEXICON
                .iter()
                .map(|(word, tag)| ((*word).to_string(), *tag))
                .collect(),
            re_number: Regex::new(r"^[+-]?\d+(?:[.,]\d+)*%?$")?,
            re_capitalized: Regex::new(r"^[A-Z][A-Za-z'\-]*$")?,
            re_punct: Regex::new(r"^[[:punct:]]+$")?,
        })
    }

    fn tag_token(&self, token: &str) -> &'static str {
        match token {
            "." | "!" | "?" => return ".",
            "," => return ",",
            ":" | ";" | "--" | "..." => return ":",
            "'s" | "'" => return "POS",
            "(" | "[" | "{" => return "(",
            ")" | "]" | "}" => return ")",
            "``" | "\"" => return "``",
            "''" => return "''",
            _ => {}
        }

        if self.re_punct.is_match(token) {
            return "SYM";
        }
        if self.re_number.is_match(token) {
            return "CD";
        }

        let lower = token.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower).copied() {
            return tag;
        }

        if self.re_capitalized.is_match(token) {
            // Acronym plurals such as "CEOs".
            let stem = token.strip_suffix('s').unwrap_or_default();
            return if stem.len() > 1 && stem.chars().all(|c| c.is_ascii_uppercase()) {
                "NNPS"
            } else {
                "NNP"
            };
        }

        if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") {
            "VBG"
        } else if lower.ends_with("ed") {
            "VBD"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            "NNS"
        } else {
            "NN"
        }
    }
}

impl PosTagger for HeuristicPosTagger {
    fn tag(&self, tokens: &[String]) -> Vec<(String, PosTag)> {
        tokens
            .iter()
            .map(|token| (token.clone(), PosTag::new(self.tag_token(token))))
            .collect()
    }
}
