//! Error types for the refcast-baseline crate.

use chrono::{DateTime, Utc};
use refcast_calendar::CalendarError;
use refcast_rescale::RescaleError;
use refcast_series::{SeriesError, TimeScale};

/// Errors raised while building or applying a baseline generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BaselineError {
    /// Admissibility bounds that enclose no instant.
    #[error("the climatology period is invalid: the maximum {maximum} must be later than the minimum {minimum}")]
    InvalidPeriod {
        /// Earliest admissible instant.
        minimum: DateTime<Utc>,
        /// Latest admissible instant.
        maximum: DateTime<Utc>,
    },

    /// Negative persistence order.
    #[error("a positive order of persistence is required: {order}")]
    InvalidOrder {
        /// The rejected order.
        order: i64,
    },

    /// No source series, or none with events.
    #[error("cannot create a {generator} baseline without one or more source time-series that contain some events")]
    EmptySource {
        /// Which generator was being built.
        generator: &'static str,
    },

    /// A source series carries a `T0` reference time.
    #[error(
        "cannot create a {generator} baseline from forecast-like data: a source time-series for feature {feature} has a reference time of type T0; use observation-like time-series instead"
    )]
    ForecastLikeSource {
        /// Which generator was being built.
        generator: &'static str,
        /// Feature of the first forecast-like series.
        feature: String,
    },

    /// No series is long enough for the persistence order.
    #[error(
        "at least one time-series that contains {order} events is required to generate persistence of order {order}, but no source time-series met this requirement"
    )]
    InsufficientHistory {
        /// The persistence order.
        order: usize,
    },

    /// The template feature has no source series.
    #[error(
        "failed to discover a source time-series for the template time-series with feature {feature}; source time-series were only available for features {known:?}"
    )]
    UnknownFeature {
        /// Feature of the template.
        feature: String,
        /// Features with a source series.
        known: Vec<String>,
    },

    /// Rescaling is needed and no upscaler was supplied.
    #[error(
        "the template has a desired time scale of {desired} but the source has a time scale of {existing}, and no temporal upscaler was supplied on construction"
    )]
    MissingUpscaler {
        /// Time scale of the template.
        desired: TimeScale,
        /// Time scale of the source.
        existing: TimeScale,
    },

    /// Rescaling error.
    #[error(transparent)]
    Rescale(#[from] RescaleError),

    /// Series construction error.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}
