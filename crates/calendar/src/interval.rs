//! Aggregation intervals bounded by calendar month-days.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::CalendarError;
use crate::month_day::MonthDay;

fn nano() -> TimeDelta {
    TimeDelta::nanoseconds(1)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn out_of_range(instant: DateTime<Utc>) -> CalendarError {
    CalendarError::OutOfRange { instant, years: 1 }
}

/// Returns the right-closed interval `(start, end]` whose month-day bookends
/// surround `instant`.
///
/// The start bound is one nanosecond before the start of the start day, so
/// the whole start day falls inside the interval. The end bound is the last
/// nanosecond of the end day. When the start month-day is later in the year
/// than the end month-day the interval spans a year end, and the year of
/// each bound is chosen so that the instant's own year is on the correct
/// side. A missing bookend is derived from the other one and `period`.
///
/// # Errors
///
/// Returns [`CalendarError::IncompleteInterval`] if both bookends are
/// missing, or one is missing without a period.
pub fn month_day_interval(
    instant: DateTime<Utc>,
    start: Option<MonthDay>,
    end: Option<MonthDay>,
    period: Option<TimeDelta>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CalendarError> {
    let year = instant.year();
    let mut start_year = year;
    let mut end_year = year;

    // Spans a year end
    match (start, end) {
        (Some(s), Some(e)) if s > e => {
            if MonthDay::of(instant) >= s {
                end_year = year + 1;
            } else {
                start_year = year - 1;
            }
        }
        _ => {}
    }

    let lower = match start {
        Some(md) => {
            let date = md.at_year(start_year).ok_or_else(|| out_of_range(instant))?;
            Some(start_of_day(date) - nano())
        }
        None => None,
    };

    let upper = match end {
        Some(md) => {
            let next = md
                .at_year(end_year)
                .and_then(|d| d.succ_opt())
                .ok_or_else(|| out_of_range(instant))?;
            Some(start_of_day(next) - nano())
        }
        None => None,
    };

    match (lower, upper, period) {
        (Some(l), Some(u), _) => Ok((l, u)),
        (Some(l), None, Some(p)) => Ok((l, l + p)),
        (None, Some(u), Some(p)) => Ok((u - p, u)),
        (None, None, _) => Err(CalendarError::IncompleteInterval {
            reason: "no month-day bookends",
        }),
        _ => Err(CalendarError::IncompleteInterval {
            reason: "one month-day bookend and no period",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn md(m: u8, d: u8) -> Option<MonthDay> {
        Some(MonthDay::new(m, d).unwrap())
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn same_year_interval() {
        let (l, u) = month_day_interval(utc(1988, 4, 3), md(4, 1), md(4, 2), None).unwrap();
        assert_eq!(l, utc(1988, 4, 1) - nano());
        assert_eq!(u, utc(1988, 4, 3) - nano());
    }

    #[test]
    fn wrapping_interval_after_start() {
        let (l, u) = month_day_interval(utc(1988, 12, 15), md(12, 1), md(2, 28), None).unwrap();
        assert_eq!(l, utc(1988, 12, 1) - nano());
        assert_eq!(u, utc(1989, 3, 1) - nano());
    }

    #[test]
    fn wrapping_interval_before_start() {
        let (l, u) = month_day_interval(utc(1989, 1, 15), md(12, 1), md(2, 28), None).unwrap();
        assert_eq!(l, utc(1988, 12, 1) - nano());
        assert_eq!(u, utc(1989, 3, 1) - nano());
    }

    #[test]
    fn start_only_uses_period() {
        let (l, u) =
            month_day_interval(utc(1988, 5, 1), md(4, 1), None, Some(TimeDelta::days(10))).unwrap();
        assert_eq!(l, utc(1988, 4, 1) - nano());
        assert_eq!(u, utc(1988, 4, 11) - nano());
    }

    #[test]
    fn end_only_uses_period() {
        let (l, u) =
            month_day_interval(utc(1988, 5, 1), None, md(4, 2), Some(TimeDelta::days(2))).unwrap();
        assert_eq!(u, utc(1988, 4, 3) - nano());
        assert_eq!(l, utc(1988, 4, 1) - nano());
    }

    #[test]
    fn missing_everything_is_error() {
        let err = month_day_interval(utc(1988, 5, 1), None, None, None).unwrap_err();
        assert!(matches!(err, CalendarError::IncompleteInterval { .. }));
    }

    #[test]
    fn single_bookend_without_period_is_error() {
        let err = month_day_interval(utc(1988, 5, 1), md(4, 1), None, None).unwrap_err();
        assert_eq!(
            err,
            CalendarError::IncompleteInterval {
                reason: "one month-day bookend and no period"
            }
        );
    }
}
