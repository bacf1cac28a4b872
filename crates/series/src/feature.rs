//! Geographic feature identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity used to correlate a template series with its source series.
///
/// Two features match only when name and geometry are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Feature {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wkt: Option<String>,
}

impl Feature {
    /// Creates a feature with a name and no geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wkt: None,
        }
    }

    /// Sets the well-known-text geometry.
    pub fn with_wkt(mut self, wkt: impl Into<String>) -> Self {
        self.wkt = Some(wkt.into());
        self
    }

    /// Returns the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the geometry, if any.
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.wkt {
            Some(wkt) => write!(f, "{} ({wkt})", self.name),
            None => f.write_str(&self.name),
        }
    }
}
