//! # refcast-rescale
//!
//! Temporal upscaling and measurement-unit alignment for time-series.
//!
//! The baseline generators depend only on the [`Upscaler`] trait; the
//! [`BasicUpscaler`] implementation aggregates `f64` series by mean, sum,
//! minimum or maximum over right-closed intervals `(end - period, end]`, or
//! over intervals bounded by calendar month-days.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::collections::BTreeSet;
//! use refcast_rescale::{BasicUpscaler, UnitMapper, Upscaler};
//!
//! let units = UnitMapper::new().with_conversion("CFS", "CMS", 0.028_316_846_592);
//! let upscaler = BasicUpscaler::with_units(units);
//! let desired = TimeScale::new(TimeDelta::hours(3), TimeScaleFunction::Mean)?;
//!
//! // Empty end set: consecutive intervals from the start of the series
//! let rescaled = upscaler.upscale(&hourly, &desired, &BTreeSet::new(), "CMS")?;
//! for warning in &rescaled.warnings {
//!     tracing::debug!(%warning, "rescaling");
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `upscaler` | `Upscaler` trait, `Rescaled` output and scale warnings |
//! | `basic` | Mean/sum/min/max upscaler for `f64` series |
//! | `units` | Linear unit conversions |
//! | `error` | Error types |

mod basic;
mod error;
mod units;
mod upscaler;

pub use basic::BasicUpscaler;
pub use error::RescaleError;
pub use units::UnitMapper;
pub use upscaler::{Rescaled, ScaleWarning, Upscaler, WarningLevel, is_rescaling_required};
