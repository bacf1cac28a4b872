//! Mean, sum, minimum and maximum upscaling of `f64` series.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use refcast_calendar::month_day_interval;
use refcast_series::{Event, MISSING_DOUBLE, SeriesError, TimeScale, TimeScaleFunction, TimeSeries};
use tracing::trace;

use crate::error::RescaleError;
use crate::units::UnitMapper;
use crate::upscaler::{Rescaled, ScaleWarning, Upscaler};

/// Upscaler for single-valued series.
///
/// An interval contributes a value only if it holds at least two events
/// spaced evenly, counting the gap from the open lower bound for
/// fixed-period intervals. Non-finite aggregates become [`MISSING_DOUBLE`].
#[derive(Debug, Clone, Default)]
pub struct BasicUpscaler {
    units: UnitMapper,
}

impl BasicUpscaler {
    /// Creates an upscaler that only accepts matching units.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an upscaler that converts units with `units`.
    pub fn with_units(units: UnitMapper) -> Self {
        Self { units }
    }

    fn rescale(
        &self,
        series: &TimeSeries<f64>,
        desired: &TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        warnings: &mut Vec<ScaleWarning>,
    ) -> Result<TimeSeries<f64>, RescaleError> {
        let Some(existing) = series.time_scale() else {
            trace!(%desired, "existing time scale missing, assuming it matches");
            return Ok(series.clone());
        };

        if series.is_empty() || (existing.is_instantaneous() && desired.is_instantaneous()) {
            return Ok(series.clone());
        }

        let metadata = series.metadata().clone().with_time_scale(*desired);

        let intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = if desired.has_month_days() {
            let mut set = BTreeSet::new();
            for time in series.times() {
                set.insert(month_day_interval(
                    time,
                    desired.start_month_day(),
                    desired.end_month_day(),
                    desired.period(),
                )?);
            }
            set.into_iter().collect()
        } else {
            let period = desired.period().ok_or(SeriesError::InvalidTimeScale {
                reason: "a time scale without month-days requires a period",
            })?;
            if existing.period() == Some(period) {
                return Ok(TimeSeries::new(metadata, series.events().to_vec())?);
            }
            let ends = if ends_at.is_empty() {
                dense_ends(series, period)
            } else {
                ends_at.clone()
            };
            ends.into_iter().map(|end| (end - period, end)).collect()
        };

        let events = series.events();
        let mut upscaled = Vec::with_capacity(intervals.len());
        for (lower, upper) in intervals {
            let from = events.partition_point(|e| e.time() <= lower);
            let to = events.partition_point(|e| e.time() <= upper);
            let group = &events[from..to];

            if group.len() < 2 {
                warnings.push(ScaleWarning::debug(format!(
                    "skipped the interval ({lower}, {upper}]: found {} events, at least two are \
                     needed to upscale to {desired}",
                    group.len()
                )));
                continue;
            }

            let times = group.iter().map(Event::time);
            let spaced = if desired.has_month_days() {
                evenly_spaced(times)
            } else {
                evenly_spaced(std::iter::once(lower).chain(times))
            };
            if !spaced {
                warnings.push(ScaleWarning::debug(format!(
                    "skipped the interval ({lower}, {upper}]: the {} events are not evenly spaced",
                    group.len()
                )));
                continue;
            }

            let values: Vec<f64> = group.iter().map(|e| *e.value()).collect();
            upscaled.push(Event::new(upper, aggregate(desired.function(), &values)?));
        }

        Ok(TimeSeries::new(metadata, upscaled)?)
    }
}

impl Upscaler<f64> for BasicUpscaler {
    #[tracing::instrument(
        skip_all,
        fields(feature = %series.feature(), %desired, n_ends = ends_at.len())
    )]
    fn upscale(
        &self,
        series: &TimeSeries<f64>,
        desired: &TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        desired_unit: &str,
    ) -> Result<Rescaled<f64>, RescaleError> {
        let mut warnings = validate(series.time_scale(), desired)?;
        let rescaled = self.rescale(series, desired, ends_at, &mut warnings)?;
        let series = self.units.convert(rescaled, desired_unit)?;
        trace!(n_events = series.len(), n_warnings = warnings.len(), "upscaled");
        Ok(Rescaled { series, warnings })
    }
}

/// Checks that `existing` can be upscaled to `desired`.
fn validate(
    existing: Option<&TimeScale>,
    desired: &TimeScale,
) -> Result<Vec<ScaleWarning>, RescaleError> {
    let Some(existing) = existing else {
        if desired.is_instantaneous() {
            return Ok(vec![ScaleWarning::debug(
                "the existing time scale is missing; assuming it is instantaneous",
            )]);
        }
        return Err(RescaleError::MissingExistingScale { desired: *desired });
    };

    let same_period = existing.period().is_some() && existing.period() == desired.period();
    let change_required = existing != desired
        && !(existing.is_instantaneous() && desired.is_instantaneous())
        && !(same_period && existing.function() == TimeScaleFunction::Unknown);
    if !change_required {
        return Ok(Vec::new());
    }

    let mut warnings = Vec::new();

    if desired.function() == TimeScaleFunction::Unknown {
        return Err(RescaleError::UnknownFunction { desired: *desired });
    }

    if let (Some(have), Some(want)) = (existing.period(), desired.period()) {
        if have > want {
            return Err(RescaleError::Downscaling {
                existing: *existing,
                desired: *desired,
            });
        }
        let (have, want) = (have.num_seconds(), want.num_seconds());
        if have == 0 || want == 0 || want % have != 0 {
            return Err(RescaleError::NonIntegerMultiple {
                existing: *existing,
                desired: *desired,
            });
        }
        if same_period && existing.function() != desired.function() {
            return Err(RescaleError::FunctionChange {
                existing: *existing,
                desired: *desired,
            });
        }
    }

    if desired.function() == TimeScaleFunction::Sum {
        if existing.is_instantaneous() {
            return Err(RescaleError::AccumulateInstantaneous { desired: *desired });
        }
        match existing.function() {
            TimeScaleFunction::Sum => {}
            TimeScaleFunction::Unknown => warnings.push(ScaleWarning::warn(format!(
                "the existing time scale {existing} has an UNKNOWN function; assuming it is a SUM"
            ))),
            other => return Err(RescaleError::AccumulateNonAccumulation { existing: other }),
        }
    }

    Ok(warnings)
}

/// End times of consecutive intervals, starting one time step before the
/// first event so the first event falls inside the first interval.
fn dense_ends(series: &TimeSeries<f64>, period: TimeDelta) -> BTreeSet<DateTime<Utc>> {
    let mut ends = BTreeSet::new();
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return ends;
    };
    let step = match series.events() {
        [a, b, ..] => b.time() - a.time(),
        _ => TimeDelta::zero(),
    };
    let mut check = first.time() - step;
    while check < last.time() {
        check += period;
        ends.insert(check);
    }
    ends
}

fn evenly_spaced(times: impl Iterator<Item = DateTime<Utc>>) -> bool {
    let times: Vec<_> = times.collect();
    let mut gaps = times.windows(2).map(|w| w[1] - w[0]);
    match gaps.next() {
        Some(first) => gaps.all(|g| g == first),
        None => true,
    }
}

fn aggregate(function: TimeScaleFunction, values: &[f64]) -> Result<f64, RescaleError> {
    if values.iter().any(|v| v.is_nan()) {
        return Ok(MISSING_DOUBLE);
    }
    let value = match function {
        TimeScaleFunction::Mean => values.iter().sum::<f64>() / values.len() as f64,
        TimeScaleFunction::Sum => values.iter().sum(),
        TimeScaleFunction::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
        TimeScaleFunction::Maximum => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        other => return Err(RescaleError::UnsupportedFunction { function: other }),
    };
    Ok(if value.is_finite() { value } else { MISSING_DOUBLE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scale(hours: i64, function: TimeScaleFunction) -> TimeScale {
        TimeScale::new(TimeDelta::hours(hours), function).unwrap()
    }

    #[test]
    fn aggregate_functions() {
        let v = [1.0, 4.0, 2.5];
        assert_relative_eq!(aggregate(TimeScaleFunction::Mean, &v).unwrap(), 2.5);
        assert_relative_eq!(aggregate(TimeScaleFunction::Sum, &v).unwrap(), 7.5);
        assert_relative_eq!(aggregate(TimeScaleFunction::Minimum, &v).unwrap(), 1.0);
        assert_relative_eq!(aggregate(TimeScaleFunction::Maximum, &v).unwrap(), 4.0);
    }

    #[test]
    fn aggregate_missing_in_missing_out() {
        assert!(aggregate(TimeScaleFunction::Mean, &[1.0, f64::NAN]).unwrap().is_nan());
        assert!(aggregate(TimeScaleFunction::Maximum, &[f64::NAN, 1.0]).unwrap().is_nan());
    }

    #[test]
    fn aggregate_overflow_is_missing() {
        assert!(aggregate(TimeScaleFunction::Sum, &[f64::MAX, f64::MAX]).unwrap().is_nan());
    }

    #[test]
    fn aggregate_rejects_unknown() {
        assert_eq!(
            aggregate(TimeScaleFunction::Unknown, &[1.0]).unwrap_err(),
            RescaleError::UnsupportedFunction {
                function: TimeScaleFunction::Unknown
            }
        );
    }

    #[test]
    fn evenly_spaced_detects_gaps() {
        let t = |h| DateTime::<Utc>::UNIX_EPOCH + TimeDelta::hours(h);
        assert!(evenly_spaced([t(0), t(1), t(2)].into_iter()));
        assert!(!evenly_spaced([t(0), t(1), t(3)].into_iter()));
        assert!(evenly_spaced([t(0)].into_iter()));
    }

    #[test]
    fn validate_rejects_downscaling() {
        let err = validate(
            Some(&scale(6, TimeScaleFunction::Mean)),
            &scale(1, TimeScaleFunction::Mean),
        )
        .unwrap_err();
        assert!(matches!(err, RescaleError::Downscaling { .. }));
    }

    #[test]
    fn validate_rejects_non_integer_multiple() {
        let err = validate(
            Some(&scale(2, TimeScaleFunction::Mean)),
            &scale(3, TimeScaleFunction::Mean),
        )
        .unwrap_err();
        assert!(matches!(err, RescaleError::NonIntegerMultiple { .. }));
    }

    #[test]
    fn validate_rejects_function_change_at_same_period() {
        let err = validate(
            Some(&scale(3, TimeScaleFunction::Mean)),
            &scale(3, TimeScaleFunction::Maximum),
        )
        .unwrap_err();
        assert!(matches!(err, RescaleError::FunctionChange { .. }));
    }

    #[test]
    fn validate_rejects_accumulating_instantaneous() {
        let err = validate(
            Some(&TimeScale::instantaneous()),
            &scale(3, TimeScaleFunction::Sum),
        )
        .unwrap_err();
        assert!(matches!(err, RescaleError::AccumulateInstantaneous { .. }));
    }

    #[test]
    fn validate_rejects_accumulating_means() {
        let err = validate(
            Some(&scale(1, TimeScaleFunction::Mean)),
            &scale(3, TimeScaleFunction::Sum),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RescaleError::AccumulateNonAccumulation {
                existing: TimeScaleFunction::Mean
            }
        );
    }

    #[test]
    fn validate_warns_on_unknown_accumulation() {
        let warnings = validate(
            Some(&scale(1, TimeScaleFunction::Unknown)),
            &scale(3, TimeScaleFunction::Sum),
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn validate_rejects_unknown_desired_function() {
        let err = validate(
            Some(&scale(1, TimeScaleFunction::Mean)),
            &scale(3, TimeScaleFunction::Unknown),
        )
        .unwrap_err();
        assert!(matches!(err, RescaleError::UnknownFunction { .. }));
    }

    #[test]
    fn validate_missing_existing_scale() {
        let err = validate(None, &scale(3, TimeScaleFunction::Mean)).unwrap_err();
        assert!(matches!(err, RescaleError::MissingExistingScale { .. }));
        assert!(validate(None, &TimeScale::instantaneous()).is_ok());
    }
}
