//! Time-ordered events with metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SeriesError;
use crate::event::Event;
use crate::feature::Feature;
use crate::metadata::TimeSeriesMetadata;
use crate::missing::MissingValue;
use crate::time_scale::TimeScale;

/// Events sorted ascending by time, with no repeated instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries<T> {
    metadata: TimeSeriesMetadata,
    events: Vec<Event<T>>,
}

impl<T> TimeSeries<T> {
    /// Creates a series, sorting the events by time.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::DuplicateTime`] if two events share an instant.
    pub fn new(
        metadata: TimeSeriesMetadata,
        mut events: Vec<Event<T>>,
    ) -> Result<Self, SeriesError> {
        events.sort_by_key(Event::time);
        if let Some(pair) = events.windows(2).find(|w| w[0].time() == w[1].time()) {
            return Err(SeriesError::DuplicateTime {
                time: pair[0].time(),
                feature: metadata.feature().name().to_string(),
            });
        }
        Ok(Self { metadata, events })
    }

    /// Creates a series from values keyed by time. Keys are unique and
    /// ordered, so this cannot fail.
    pub fn from_map(metadata: TimeSeriesMetadata, values: BTreeMap<DateTime<Utc>, T>) -> Self {
        let events = values.into_iter().map(|(t, v)| Event::new(t, v)).collect();
        Self { metadata, events }
    }

    /// Creates a series without events.
    pub fn empty(metadata: TimeSeriesMetadata) -> Self {
        Self {
            metadata,
            events: Vec::new(),
        }
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &TimeSeriesMetadata {
        &self.metadata
    }

    /// Returns the events in ascending time order.
    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    /// Returns the valid times in ascending order.
    pub fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.events.iter().map(Event::time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&Event<T>> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&Event<T>> {
        self.events.last()
    }

    /// Returns the event at exactly `time`.
    pub fn get(&self, time: DateTime<Utc>) -> Option<&Event<T>> {
        self.events
            .binary_search_by_key(&time, Event::time)
            .ok()
            .map(|i| &self.events[i])
    }

    pub fn feature(&self) -> &Feature {
        self.metadata.feature()
    }

    pub fn unit(&self) -> &str {
        self.metadata.unit()
    }

    pub fn time_scale(&self) -> Option<&TimeScale> {
        self.metadata.time_scale()
    }

    /// Replaces the measurement unit, keeping everything else.
    pub fn with_unit(self, unit: impl Into<String>) -> Self {
        let metadata = self.metadata.with_unit(unit);
        Self { metadata, ..self }
    }

    /// Splits the series into metadata and events.
    pub fn into_parts(self) -> (TimeSeriesMetadata, Vec<Event<T>>) {
        (self.metadata, self.events)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de> + MissingValue"))]
struct RawTimeSeries<T> {
    metadata: TimeSeriesMetadata,
    #[serde(default = "Vec::new")]
    events: Vec<Event<T>>,
}

impl<'de, T: Deserialize<'de> + MissingValue> Deserialize<'de> for TimeSeries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTimeSeries::<T>::deserialize(deserializer)?;
        TimeSeries::new(raw.metadata, raw.events).map_err(serde::de::Error::custom)
    }
}
