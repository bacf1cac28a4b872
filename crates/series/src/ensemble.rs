//! Labelled ensemble of double values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SeriesError;

/// Members with a parallel array of labels of the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ensemble {
    members: Vec<f64>,
    labels: Vec<String>,
}

impl Ensemble {
    /// Creates an ensemble.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LabelMismatch`] if the lengths differ.
    pub fn new(members: Vec<f64>, labels: Vec<String>) -> Result<Self, SeriesError> {
        if members.len() != labels.len() {
            return Err(SeriesError::LabelMismatch {
                members: members.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { members, labels })
    }

    /// Builds an ensemble from `(label, member)` pairs.
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f64)>) -> Self {
        let (labels, members) = pairs.into_iter().map(|(l, m)| (l.into(), m)).unzip();
        Self { members, labels }
    }

    pub fn members(&self) -> &[f64] {
        &self.members
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member with the given label.
    pub fn member(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.members[i])
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnsemble {
    #[serde(deserialize_with = "crate::missing::members_or_missing")]
    members: Vec<f64>,
    labels: Vec<String>,
}

impl<'de> Deserialize<'de> for Ensemble {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnsemble::deserialize(deserializer)?;
        Ensemble::new(raw.members, raw.labels).map_err(serde::de::Error::custom)
    }
}
