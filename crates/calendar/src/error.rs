//! Error types for the refcast-calendar crate.

use chrono::{DateTime, Utc};

/// Error type for all fallible operations in the refcast-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a month-day string cannot be parsed.
    #[error("invalid month-day: {text:?} (expected --MM-DD)")]
    InvalidMonthDay {
        /// The text that failed to parse.
        text: String,
    },

    /// Returned when shifting an instant leaves the representable range.
    #[error("cannot shift {instant} by {years} years: out of range")]
    OutOfRange {
        /// The instant being shifted.
        instant: DateTime<Utc>,
        /// The number of years requested.
        years: u32,
    },

    /// Returned when a month-day interval lacks the information to close it.
    #[error("incomplete month-day interval: {reason}")]
    IncompleteInterval {
        /// What is missing.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn error_invalid_month() {
        let err = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(err.to_string(), "invalid month: 13 (must be 1..=12)");
    }

    #[test]
    fn error_invalid_day() {
        let err = CalendarError::InvalidDay {
            day: 31,
            month: 4,
            max_day: 30,
        };
        assert_eq!(err.to_string(), "invalid day: 31 for month 4 (max 30)");
    }

    #[test]
    fn error_invalid_month_day() {
        let err = CalendarError::InvalidMonthDay {
            text: "April".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid month-day: \"April\" (expected --MM-DD)"
        );
    }

    #[test]
    fn error_out_of_range() {
        let instant = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let err = CalendarError::OutOfRange {
            instant,
            years: 400_000,
        };
        assert_eq!(
            err.to_string(),
            "cannot shift 2000-01-01 00:00:00 UTC by 400000 years: out of range"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }
}
