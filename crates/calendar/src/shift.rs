//! Year replacement and year arithmetic on UTC instants.

use chrono::{DateTime, Datelike, Months, TimeDelta, Utc};

use crate::error::CalendarError;

/// Returns the instant with the same month, day and time of day in `year`.
///
/// An instant on February 29 has no counterpart in a common year and
/// yields `None`.
pub fn with_year(instant: DateTime<Utc>, year: i32) -> Option<DateTime<Utc>> {
    instant.with_year(year)
}

fn months_in(instant: DateTime<Utc>, years: u32) -> Result<Months, CalendarError> {
    years
        .checked_mul(12)
        .map(Months::new)
        .ok_or(CalendarError::OutOfRange { instant, years })
}

/// Subtracts whole calendar years. February 29 clamps to February 28.
///
/// # Errors
///
/// Returns [`CalendarError::OutOfRange`] if the result is not representable.
pub fn minus_years(instant: DateTime<Utc>, years: u32) -> Result<DateTime<Utc>, CalendarError> {
    instant
        .checked_sub_months(months_in(instant, years)?)
        .ok_or(CalendarError::OutOfRange { instant, years })
}

/// Adds whole calendar years. February 29 clamps to February 28.
///
/// # Errors
///
/// Returns [`CalendarError::OutOfRange`] if the result is not representable.
pub fn plus_years(instant: DateTime<Utc>, years: u32) -> Result<DateTime<Utc>, CalendarError> {
    instant
        .checked_add_months(months_in(instant, years)?)
        .ok_or(CalendarError::OutOfRange { instant, years })
}

/// Returns the interval that starts `lag` years before `anchor` and ends one
/// nanosecond before the instant `lag - 1` years before `anchor`.
///
/// Both returned bounds are meant to be tested inclusively. A lag of zero
/// yields the year that starts at the anchor.
///
/// # Errors
///
/// Returns [`CalendarError::OutOfRange`] if either bound is not representable.
pub fn lagged_year_interval(
    anchor: DateTime<Utc>,
    lag: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CalendarError> {
    let lower = minus_years(anchor, lag)?;
    let next = match lag {
        0 => plus_years(anchor, 1)?,
        _ => minus_years(anchor, lag - 1)?,
    };
    let upper = next
        .checked_sub_signed(TimeDelta::nanoseconds(1))
        .ok_or(CalendarError::OutOfRange {
            instant: anchor,
            years: lag,
        })?;
    Ok((lower, upper))
}
