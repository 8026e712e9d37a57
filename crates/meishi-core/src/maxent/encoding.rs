//! Binary joint-feature encoding.
//!
//! Every `(feature name, feature value, label)` triple observed in training
//! becomes one weight. At classification time a feature set activates, for
//! each label, the triples it shares with the training data; anything unseen
//! is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{FeatureSet, FeatureValue};

/// One joint feature: a (name, value) pair conjoined with a label index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointFeature {
    pub name: String,
    pub value: FeatureValue,
    pub label: usize,
}

/// Mapping between joint features and dense weight ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<JointFeature>", into = "Vec<JointFeature>")]
pub struct FeatureEncoding {
    features: Vec<JointFeature>,
    // name -> value -> [(label, id)]
    index: HashMap<String, HashMap<FeatureValue, Vec<(usize, usize)>>>,
}

impl FeatureEncoding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every feature of `features` under `label`. Already-known
    /// triples keep their id.
    pub fn observe(&mut self, features: &FeatureSet, label: usize) {
        for (name, value) in features.iter() {
            if self.id(name, value, label).is_none() {
                self.push(JointFeature {
                    name: name.to_string(),
                    value: value.clone(),
                    label,
                });
            }
        }
    }

    fn push(&mut self, feature: JointFeature) {
        let id = self.features.len();
        self.index
            .entry(feature.name.clone())
            .or_default()
            .entry(feature.value.clone())
            .or_default()
            .push((feature.label, id));
        self.features.push(feature);
    }

    /// Id of a joint feature, if it was observed.
    #[must_use]
    pub fn id(&self, name: &str, value: &FeatureValue, label: usize) -> Option<usize> {
        self.index
            .get(name)?
            .get(value)?
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, id)| *id)
    }

    /// Active feature ids of `features`, one list per label in `0..num_labels`.
    #[must_use]
    pub fn encode(&self, features: &FeatureSet, num_labels: usize) -> Vec<Vec<usize>> {
        let mut active = vec![Vec::new(); num_labels];
        for (name, value) in features.iter() {
            let Some(pairs) = self.index.get(name).and_then(|values| values.get(value)) else {
                continue;
            };
            for &(label, id) in pairs {
                if let Some(ids) = active.get_mut(label) {
                    ids.push(id);
                }
            }
        }
        active
    }

    #[must_use]
    pub fn feature(&self, id: usize) -> Option<&JointFeature> {
        self.features.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointFeature> {
        self.features.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl From<Vec<JointFeature>> for FeatureEncoding {
    fn from(features: Vec<JointFeature>) -> Self {
        let mut encoding = Self::new();
        for feature in features {
            encoding.push(feature);
        }
        encoding
    }
}

impl From<FeatureEncoding> for Vec<JointFeature> {
    fn from(encoding: FeatureEncoding) -> Self {
        encoding.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs(pairs: &[(&str, FeatureValue)]) -> FeatureSet {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_observe_and_encode() {
        let mut enc = FeatureEncoding::new();
        let a = fs(&[
            ("has_(Jones)", FeatureValue::ON),
            ("prev_label", FeatureValue::Text("O".into())),
        ]);
        let b = fs(&[("prev_label", FeatureValue::Text("O".into()))]);

        enc.observe(&a, 1);
        enc.observe(&b, 0);
        enc.observe(&b, 0);
        assert_eq!(enc.len(), 3);

        let active = enc.encode(&a, 2);
        assert_eq!(active[0].len(), 1);
        assert_eq!(active[1].len(), 2);

        let unseen = fs(&[
            ("prev_label", FeatureValue::Text("PERSON".into())),
            ("has_(Smith)", FeatureValue::ON),
        ]);
        assert_eq!(enc.encode(&unseen, 2), vec![Vec::<usize>::new(), Vec::new()]);
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let mut enc = FeatureEncoding::new();
        enc.observe(&fs(&[("honorific", FeatureValue::ON)]), 1);

        let json = serde_json::to_string(&enc).unwrap();
        let back: FeatureEncoding = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back.id("honorific", &FeatureValue::ON, 1), Some(0));
        assert_eq!(back.id("honorific", &FeatureValue::ON, 0), None);
    }
}
