//! A value at an instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::missing::MissingValue;

/// An immutable `(time, value)` pair.
///
/// Equality compares both fields. Inside a [`TimeSeries`](crate::TimeSeries)
/// events are ordered by time alone. A `null` value reads as
/// [`MissingValue::missing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + MissingValue"))]
pub struct Event<T> {
    time: DateTime<Utc>,
    #[serde(deserialize_with = "crate::missing::or_missing")]
    value: T,
}

impl<T> Event<T> {
    /// Creates a new event.
    pub fn new(time: DateTime<Utc>, value: T) -> Self {
        Self { time, value }
    }

    /// Returns the valid time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Returns the value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the event and returns its value.
    pub fn into_value(self) -> T {
        self.value
    }
}
