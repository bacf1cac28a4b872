//! Error types for the refcast-series crate.

use chrono::{DateTime, Utc};
use refcast_calendar::CalendarError;

/// Errors raised while constructing series model values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Two events share an instant.
    #[error("duplicate event time {time} in time-series for feature {feature}")]
    DuplicateTime {
        /// The repeated instant.
        time: DateTime<Utc>,
        /// Feature name of the offending series.
        feature: String,
    },

    /// Ensemble members and labels differ in length.
    #[error("ensemble has {members} members but {labels} labels")]
    LabelMismatch {
        /// Number of members.
        members: usize,
        /// Number of labels.
        labels: usize,
    },

    /// A time scale could not be formed.
    #[error("invalid time scale: {reason}")]
    InvalidTimeScale {
        /// Description of the violated constraint.
        reason: &'static str,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
