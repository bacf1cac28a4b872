//! Generator configuration.

use chrono::{DateTime, Utc};

/// Configuration for [`ClimatologyGenerator`](crate::ClimatologyGenerator).
#[derive(Debug, Clone, PartialEq)]
pub struct ClimatologyConfig {
    unit: String,
    minimum: Option<DateTime<Utc>>,
    maximum: Option<DateTime<Utc>>,
}

impl ClimatologyConfig {
    /// Creates a configuration with an unbounded admissibility window.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            minimum: None,
            maximum: None,
        }
    }

    /// Sets the earliest admissible source instant, inclusive.
    pub fn with_minimum(mut self, minimum: DateTime<Utc>) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the latest admissible source instant, inclusive.
    pub fn with_maximum(mut self, maximum: DateTime<Utc>) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Returns the unit requested from the upscaler.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn minimum(&self) -> Option<DateTime<Utc>> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<DateTime<Utc>> {
        self.maximum
    }

    /// Whether `time` lies inside the admissibility window.
    pub fn admits(&self, time: DateTime<Utc>) -> bool {
        self.minimum.is_none_or(|min| time >= min) && self.maximum.is_none_or(|max| time <= max)
    }
}

/// Configuration for [`PersistenceGenerator`](crate::PersistenceGenerator).
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceConfig {
    unit: String,
    order: i64,
}

impl PersistenceConfig {
    /// Creates a configuration for lag-one persistence.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            order: 1,
        }
    }

    /// Sets the persistence order, the number of events to step back.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Returns the unit requested from the upscaler.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn order(&self) -> i64 {
        self.order
    }
}
