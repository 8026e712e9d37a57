use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::label::Label;

/// Activation value of a single feature.
///
/// Binary features carry the integer `1`; the label-history feature carries
/// the previous token's tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Text(String),
}

impl FeatureValue {
    /// The presence marker used by every binary feature.
    pub const ON: FeatureValue = FeatureValue::Int(1);
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Label> for FeatureValue {
    fn from(label: &Label) -> Self {
        Self::Text(label.as_str().to_string())
    }
}

/// Sparse mapping from feature name to activation value.
///
/// Absent features are simply not stored. Keys are kept ordered so that
/// anything folding over a feature set does so in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeMap<String, FeatureValue>);

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to an arbitrary value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.0.insert(name.into(), value);
    }

    /// Marks the binary feature `name` as present.
    pub fn set(&mut self, name: impl Into<String>) {
        self.insert(name, FeatureValue::ON);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    /// Returns `true` if `name` is present with the value `1`.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name) == Some(&FeatureValue::ON)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FeatureValue)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (K, FeatureValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A feature set paired with its gold label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureSet,
    pub label: Label,
}

impl TrainingExample {
    pub fn new(features: FeatureSet, label: Label) -> Self {
        Self { features, label }
    }
}
