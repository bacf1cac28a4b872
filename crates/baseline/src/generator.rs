//! Common generator interface and the warning channel.

use std::fmt;

use chrono::{DateTime, Utc};
use refcast_rescale::ScaleWarning;
use refcast_series::{Feature, TimeSeries, TimeSeriesMetadata};

use crate::error::BaselineError;

/// Turns a template series into a baseline series with the template's
/// valid times.
pub trait BaselineGenerator<S, T> {
    /// Generates the baseline for `template`.
    fn generate(&self, template: &TimeSeries<S>) -> Result<TimeSeries<T>, BaselineError>;
}

/// A non-fatal finding raised while building or applying a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineWarning {
    /// Source series for one feature repeated some valid times; the first
    /// value seen was kept.
    DuplicateEvents {
        feature: Feature,
        count: usize,
        first: DateTime<Utc>,
        metadata: TimeSeriesMetadata,
    },
    /// Raised by the upscaler.
    Rescale(ScaleWarning),
}

impl fmt::Display for BaselineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEvents {
                feature,
                count,
                first,
                metadata,
            } => write!(
                f,
                "found duplicate events in the source data for feature {feature} at {count} valid times, keeping the first event at each; first duplicate time {first}; metadata: {metadata}"
            ),
            Self::Rescale(warning) => write!(f, "{warning}"),
        }
    }
}

/// A generated series plus the warnings raised while generating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub series: TimeSeries<T>,
    pub warnings: Vec<BaselineWarning>,
}

impl<T> Generated<T> {
    pub(crate) fn new(series: TimeSeries<T>, warnings: Vec<BaselineWarning>) -> Self {
        Self { series, warnings }
    }
}
