//! # refcast-series
//!
//! Value model shared by the baseline generators: timestamped events,
//! time-series with their metadata, time scales and ensembles.
//!
//! ## Architecture
//!
//! ```text
//! TimeSeries<T>
//!   ├── TimeSeriesMetadata
//!   │     ├── Feature            (correlation key between template and source)
//!   │     ├── unit, variable
//!   │     ├── Option<TimeScale>  (period | month-days, function)
//!   │     └── BTreeMap<ReferenceTimeType, DateTime<Utc>>
//!   └── Vec<Event<T>>            (ascending, unique instants)
//! ```
//!
//! A series with a `T0` reference time is forecast-like. Observation-like
//! series have no `T0`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use refcast_series::{
//!     Event, Feature, TimeScale, TimeScaleFunction, TimeSeries, TimeSeriesMetadata,
//! };
//!
//! let metadata = TimeSeriesMetadata::new(Feature::new("DRRC2"), "CMS")
//!     .with_variable("STREAMFLOW")
//!     .with_time_scale(TimeScale::new(chrono::TimeDelta::hours(1), TimeScaleFunction::Mean)?);
//! let series = TimeSeries::new(metadata, vec![Event::new(t0, 1.0), Event::new(t1, 2.0)])?;
//! assert_eq!(series.get(t1).map(|e| *e.value()), Some(2.0));
//! ```

mod ensemble;
mod error;
mod event;
mod feature;
mod metadata;
mod missing;
mod series;
mod time_scale;

pub use ensemble::Ensemble;
pub use error::SeriesError;
pub use event::Event;
pub use feature::Feature;
pub use metadata::{ReferenceTimeType, TimeSeriesMetadata};
pub use missing::MissingValue;
pub use series::TimeSeries;
pub use time_scale::{TimeScale, TimeScaleFunction};

/// Sentinel for a missing double value.
pub const MISSING_DOUBLE: f64 = f64::NAN;

/// Re-exported so downstream crates name month-day bounds without a direct
/// dependency on the calendar crate.
pub use refcast_calendar::MonthDay;
