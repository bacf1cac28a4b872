//! Temporal scale of the values in a series.

use std::fmt;

use chrono::TimeDelta;
use refcast_calendar::MonthDay;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Scales with a period at or below this length count as instantaneous.
const INSTANTANEOUS_LIMIT_SECONDS: i64 = 60;

/// Function that aggregates values over a time scale period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeScaleFunction {
    Mean,
    Sum,
    Instantaneous,
    Maximum,
    Minimum,
    Unknown,
}

impl fmt::Display for TimeScaleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "MEAN",
            Self::Sum => "SUM",
            Self::Instantaneous => "INSTANTANEOUS",
            Self::Maximum => "MAXIMUM",
            Self::Minimum => "MINIMUM",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Period and aggregation function of a series' values, optionally bounded
/// by calendar month-days.
///
/// At least one of the period and the month-day bounds is present. A scale
/// with a single month-day bound also has a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeScaleRepr", into = "TimeScaleRepr")]
pub struct TimeScale {
    period: Option<TimeDelta>,
    function: TimeScaleFunction,
    start_month_day: Option<MonthDay>,
    end_month_day: Option<MonthDay>,
}

impl TimeScale {
    /// Creates a fixed-period time scale.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidTimeScale`] if the period is not positive.
    pub fn new(period: TimeDelta, function: TimeScaleFunction) -> Result<Self, SeriesError> {
        Self::from_parts(Some(period), function, None, None)
    }

    /// The instantaneous scale, one second with an unknown function.
    pub fn instantaneous() -> Self {
        Self {
            period: Some(TimeDelta::seconds(1)),
            function: TimeScaleFunction::Unknown,
            start_month_day: None,
            end_month_day: None,
        }
    }

    /// Creates a scale bounded by month-days, for example April 1 to
    /// September 30 inclusive.
    pub fn between(start: MonthDay, end: MonthDay, function: TimeScaleFunction) -> Self {
        Self {
            period: None,
            function,
            start_month_day: Some(start),
            end_month_day: Some(end),
        }
    }

    /// Creates a scale from all of its parts.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidTimeScale`] if the parts do not describe
    /// a closed aggregation period.
    pub fn from_parts(
        period: Option<TimeDelta>,
        function: TimeScaleFunction,
        start_month_day: Option<MonthDay>,
        end_month_day: Option<MonthDay>,
    ) -> Result<Self, SeriesError> {
        if period.is_some_and(|p| p <= TimeDelta::zero()) {
            return Err(SeriesError::InvalidTimeScale {
                reason: "period must be positive",
            });
        }
        let bookends =
            usize::from(start_month_day.is_some()) + usize::from(end_month_day.is_some());
        match (period, bookends) {
            (None, 0) => Err(SeriesError::InvalidTimeScale {
                reason: "a period or month-day bounds are required",
            }),
            (None, 1) => Err(SeriesError::InvalidTimeScale {
                reason: "a single month-day bound requires a period",
            }),
            _ => Ok(Self {
                period,
                function,
                start_month_day,
                end_month_day,
            }),
        }
    }

    /// Returns the period, absent for a scale bounded by both month-days.
    pub fn period(&self) -> Option<TimeDelta> {
        self.period
    }

    /// Returns the aggregation function.
    pub fn function(&self) -> TimeScaleFunction {
        self.function
    }

    /// Returns the same scale with a different function.
    pub fn with_function(self, function: TimeScaleFunction) -> Self {
        Self { function, ..self }
    }

    /// Returns the start month-day, if bounded.
    pub fn start_month_day(&self) -> Option<MonthDay> {
        self.start_month_day
    }

    /// Returns the end month-day, if bounded.
    pub fn end_month_day(&self) -> Option<MonthDay> {
        self.end_month_day
    }

    /// Whether either month-day bound is present.
    pub fn has_month_days(&self) -> bool {
        self.start_month_day.is_some() || self.end_month_day.is_some()
    }

    /// Whether the period is sixty seconds or shorter.
    pub fn is_instantaneous(&self) -> bool {
        !self.has_month_days()
            && self
                .period
                .is_some_and(|p| p <= TimeDelta::seconds(INSTANTANEOUS_LIMIT_SECONDS))
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_instantaneous() {
            return f.write_str("[INSTANTANEOUS]");
        }
        f.write_str("[")?;
        if let Some(start) = self.start_month_day {
            write!(f, "{start}, ")?;
        }
        if let Some(end) = self.end_month_day {
            write!(f, "{end}, ")?;
        }
        if let Some(period) = self.period {
            write!(f, "{period}, ")?;
        }
        write!(f, "{}]", self.function)
    }
}

/// Wire form: the period travels as whole milliseconds.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeScaleRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period_ms: Option<i64>,
    function: TimeScaleFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_month_day: Option<MonthDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_month_day: Option<MonthDay>,
}

impl TryFrom<TimeScaleRepr> for TimeScale {
    type Error = SeriesError;

    fn try_from(repr: TimeScaleRepr) -> Result<Self, Self::Error> {
        Self::from_parts(
            repr.period_ms.map(TimeDelta::milliseconds),
            repr.function,
            repr.start_month_day,
            repr.end_month_day,
        )
    }
}

impl From<TimeScale> for TimeScaleRepr {
    fn from(scale: TimeScale) -> Self {
        Self {
            period_ms: scale.period.map(|p| p.num_milliseconds()),
            function: scale.function,
            start_month_day: scale.start_month_day,
            end_month_day: scale.end_month_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(m: u8, d: u8) -> MonthDay {
        MonthDay::new(m, d).unwrap()
    }

    #[test]
    fn instantaneous_threshold() {
        let minute = TimeScale::new(TimeDelta::seconds(60), TimeScaleFunction::Mean).unwrap();
        let longer = TimeScale::new(TimeDelta::seconds(61), TimeScaleFunction::Mean).unwrap();
        assert!(minute.is_instantaneous());
        assert!(!longer.is_instantaneous());
        assert!(TimeScale::instantaneous().is_instantaneous());
    }

    #[test]
    fn month_day_scale_is_not_instantaneous() {
        let scale = TimeScale::between(md(4, 1), md(4, 2), TimeScaleFunction::Mean);
        assert!(scale.has_month_days());
        assert!(!scale.is_instantaneous());
        assert_eq!(scale.period(), None);
    }

    #[test]
    fn rejects_non_positive_period() {
        let err = TimeScale::new(TimeDelta::zero(), TimeScaleFunction::Mean).unwrap_err();
        assert_eq!(
            err,
            SeriesError::InvalidTimeScale {
                reason: "period must be positive"
            }
        );
    }

    #[test]
    fn single_bookend_needs_period() {
        assert!(
            TimeScale::from_parts(None, TimeScaleFunction::Mean, Some(md(4, 1)), None).is_err()
        );
        assert!(
            TimeScale::from_parts(
                Some(TimeDelta::days(30)),
                TimeScaleFunction::Mean,
                Some(md(4, 1)),
                None
            )
            .is_ok()
        );
    }

    #[test]
    fn equality_includes_function() {
        let mean = TimeScale::new(TimeDelta::hours(3), TimeScaleFunction::Mean).unwrap();
        assert_ne!(mean, mean.with_function(TimeScaleFunction::Sum));
    }

    #[test]
    fn display() {
        let scale = TimeScale::new(TimeDelta::hours(1), TimeScaleFunction::Mean).unwrap();
        assert!(scale.to_string().ends_with(", MEAN]"));
        let bounded = TimeScale::between(md(4, 1), md(9, 30), TimeScaleFunction::Maximum);
        assert_eq!(bounded.to_string(), "[--04-01, --09-30, MAXIMUM]");
    }
}
