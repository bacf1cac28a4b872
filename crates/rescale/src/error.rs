//! Error types for the refcast-rescale crate.

use refcast_calendar::CalendarError;
use refcast_series::{SeriesError, TimeScale, TimeScaleFunction};

/// Error type for invalid rescaling requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RescaleError {
    /// The series has no time scale and the desired scale is not instantaneous.
    #[error(
        "cannot upscale to {desired}: the existing time scale is missing and the desired time scale is not instantaneous"
    )]
    MissingExistingScale {
        /// The requested time scale.
        desired: TimeScale,
    },

    /// Rescaling needs a known aggregation function.
    #[error("the desired time scale {desired} has an UNKNOWN function; the function must be known to rescale")]
    UnknownFunction {
        /// The requested time scale.
        desired: TimeScale,
    },

    /// The desired period is shorter than the existing one.
    #[error("downscaling is not supported: the desired time scale {desired} is smaller than the existing time scale {existing}")]
    Downscaling {
        /// Existing time scale of the series.
        existing: TimeScale,
        /// The requested time scale.
        desired: TimeScale,
    },

    /// The desired period does not divide evenly into existing periods.
    #[error("the desired time scale {desired} is not an integer multiple of the existing time scale {existing}")]
    NonIntegerMultiple {
        /// Existing time scale of the series.
        existing: TimeScale,
        /// The requested time scale.
        desired: TimeScale,
    },

    /// Same period, different function.
    #[error("the existing time scale {existing} and the desired time scale {desired} share a period but not a function")]
    FunctionChange {
        /// Existing time scale of the series.
        existing: TimeScale,
        /// The requested time scale.
        desired: TimeScale,
    },

    /// Summing instantaneous values is not meaningful.
    #[error("cannot accumulate instantaneous values to {desired}")]
    AccumulateInstantaneous {
        /// The requested time scale.
        desired: TimeScale,
    },

    /// Summing values that are not already accumulations.
    #[error("cannot accumulate values whose existing function is {existing}; only SUM values can be accumulated")]
    AccumulateNonAccumulation {
        /// Function of the existing time scale.
        existing: TimeScaleFunction,
    },

    /// No aggregation is implemented for this function.
    #[error("no upscaling function is available for {function}")]
    UnsupportedFunction {
        /// The requested function.
        function: TimeScaleFunction,
    },

    /// No conversion between the two units is known.
    #[error("no conversion is known from unit {from:?} to unit {to:?}")]
    UnitConversion {
        /// Existing unit.
        from: String,
        /// Requested unit.
        to: String,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Series construction error.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
