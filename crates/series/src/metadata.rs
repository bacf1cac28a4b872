//! Descriptive metadata carried by every time-series.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::time_scale::TimeScale;

/// Role of a reference time. The declaration order is the iteration order,
/// so `T0` is always the first reference time when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceTimeType {
    /// Forecast initialisation time; marks a series as forecast-like.
    T0,
    AnalysisStartTime,
    IssuedTime,
    ReleaseTime,
    LatestObservation,
    Unknown,
}

impl fmt::Display for ReferenceTimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::T0 => "T0",
            Self::AnalysisStartTime => "ANALYSIS_START_TIME",
            Self::IssuedTime => "ISSUED_TIME",
            Self::ReleaseTime => "RELEASE_TIME",
            Self::LatestObservation => "LATEST_OBSERVATION",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Feature, unit, variable, time scale and reference times of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesMetadata {
    feature: Feature,
    unit: String,
    #[serde(default)]
    variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_scale: Option<TimeScale>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    reference_times: BTreeMap<ReferenceTimeType, DateTime<Utc>>,
}

impl TimeSeriesMetadata {
    /// Creates metadata with no time scale and no reference times.
    pub fn new(feature: Feature, unit: impl Into<String>) -> Self {
        Self {
            feature,
            unit: unit.into(),
            variable: String::new(),
            time_scale: None,
            reference_times: BTreeMap::new(),
        }
    }

    /// Sets the variable name.
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Sets the measurement unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the time scale.
    pub fn with_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = Some(time_scale);
        self
    }

    /// Adds a reference time, replacing any existing time of the same type.
    pub fn with_reference_time(mut self, kind: ReferenceTimeType, time: DateTime<Utc>) -> Self {
        self.reference_times.insert(kind, time);
        self
    }

    /// Returns the feature.
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Returns the measurement unit.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the variable name.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns the time scale, if known.
    pub fn time_scale(&self) -> Option<&TimeScale> {
        self.time_scale.as_ref()
    }

    /// Returns all reference times.
    pub fn reference_times(&self) -> &BTreeMap<ReferenceTimeType, DateTime<Utc>> {
        &self.reference_times
    }

    /// Returns the first reference time in [`ReferenceTimeType`] order.
    pub fn first_reference_time(&self) -> Option<(ReferenceTimeType, DateTime<Utc>)> {
        self.reference_times.iter().next().map(|(k, v)| (*k, *v))
    }

    /// Whether the series carries a `T0` reference time.
    pub fn is_forecast_like(&self) -> bool {
        self.reference_times.contains_key(&ReferenceTimeType::T0)
    }
}

impl fmt::Display for TimeSeriesMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature={}, unit={}", self.feature, self.unit)?;
        if !self.variable.is_empty() {
            write!(f, ", variable={}", self.variable)?;
        }
        if let Some(scale) = &self.time_scale {
            write!(f, ", time_scale={scale}")?;
        }
        for (kind, time) in &self.reference_times {
            write!(f, ", {kind}={}", time.to_rfc3339())?;
        }
        Ok(())
    }
}
