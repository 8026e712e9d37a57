use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag string for tokens that are part of a person name.
pub const PERSON: &str = "PERSON";

/// Tag string for every other token.
pub const OUTSIDE: &str = "O";

/// Entity tag attached to exactly one token.
///
/// Corpora may carry any tag string, so this is an open newtype rather than
/// an enum; [`Label::person`] and [`Label::outside`] name the two classes the
/// reference features are built around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Creates a label from any tag string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The positive class, `PERSON`.
    #[must_use]
    pub fn person() -> Self {
        Self(PERSON.to_string())
    }

    /// The negative class, `O`.
    #[must_use]
    pub fn outside() -> Self {
        Self(OUTSIDE.to_string())
    }

    /// Returns the tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the positive class.
    #[must_use]
    pub fn is_person(&self) -> bool {
        self.0 == PERSON
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Label {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for Label {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_classes() {
        assert!(Label::person().is_person());
        assert!(!Label::outside().is_person());
        assert_eq!(Label::outside(), "O");
        assert_eq!(Label::person().to_string(), "PERSON");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::person()).unwrap();
        assert_eq!(json, "\"PERSON\"");

        let back: Label = serde_json::from_str("\"LOC\"").unwrap();
        assert_eq!(back, Label::new("LOC"));
    }
}
