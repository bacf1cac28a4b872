//! The upscaling capability used by the baseline generators.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use refcast_series::{TimeScale, TimeSeries};

use crate::error::RescaleError;

/// Severity of a [`ScaleWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningLevel {
    Debug,
    Warn,
}

/// A non-fatal finding while rescaling, such as a skipped interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleWarning {
    pub level: WarningLevel,
    pub message: String,
}

impl ScaleWarning {
    pub fn debug(message: impl Into<String>) -> Self {
        Self {
            level: WarningLevel::Debug,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: WarningLevel::Warn,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScaleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A rescaled series plus the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rescaled<T> {
    pub series: TimeSeries<T>,
    pub warnings: Vec<ScaleWarning>,
}

/// Aggregates a series to a coarser time scale.
pub trait Upscaler<T>: Send + Sync {
    /// Upscales `series` to `desired`, producing values that end at each of
    /// `ends_at`, in `desired_unit`.
    ///
    /// An empty `ends_at` asks for consecutive intervals covering the whole
    /// series. Intervals that cannot be formed are omitted from the output
    /// and reported in [`Rescaled::warnings`].
    fn upscale(
        &self,
        series: &TimeSeries<T>,
        desired: &TimeScale,
        ends_at: &BTreeSet<DateTime<Utc>>,
        desired_unit: &str,
    ) -> Result<Rescaled<T>, RescaleError>;
}

/// Whether a series at `existing` must be rescaled to match `desired`.
///
/// Only a known scale on both sides that differs calls for rescaling.
pub fn is_rescaling_required(desired: Option<&TimeScale>, existing: Option<&TimeScale>) -> bool {
    matches!((desired, existing), (Some(d), Some(e)) if d != e)
}
