//! # refcast-baseline
//!
//! Reference forecasts generated from observation-like data, used as the
//! baseline against which a real forecast is scored.
//!
//! ```text
//! source series ──► consolidate per feature ──┬──► ClimatologyGenerator ──► TimeSeries<Ensemble>
//!                                             │         (same calendar instant, other years)
//!                                             │
//!                                             └──► PersistenceGenerator ──► TimeSeries<T>
//!                                                       (value N steps before the anchor)
//!
//! template series ──► valid times, feature, desired time scale, reference times
//! ```
//!
//! Both generators are built once from the complete source and then applied
//! to any number of template series, concurrently if needed. When a template
//! asks for a coarser time scale than the source carries, the source is
//! aggregated through the [`Upscaler`](refcast_rescale::Upscaler) supplied
//! with `with_upscaler`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use refcast_baseline::{PersistenceConfig, PersistenceGenerator};
//! use refcast_rescale::BasicUpscaler;
//!
//! let config = PersistenceConfig::new("CMS").with_order(1);
//! let generator = PersistenceGenerator::new(observations, config)?
//!     .with_upscaler(Arc::new(BasicUpscaler::new()))
//!     .with_admissible(|v: &f64| v.is_finite());
//!
//! for forecast in &forecasts {
//!     let baseline = generator.generate(forecast)?;
//!     println!("{} events", baseline.len());
//! }
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `climatology` | Ensemble of same-instant values from other years |
//! | `persistence` | Lag-N persistence anchored on reference or valid times |
//! | `consolidate` | Merge of series sharing a feature, first value wins |
//! | `search` | Binary search for the Nth event before an instant |
//! | `generator` | `BaselineGenerator` trait and warning channel |
//! | `config` | Generator configuration |
//! | `error` | Error types |

mod climatology;
mod config;
mod consolidate;
mod error;
mod generator;
mod persistence;
mod search;

pub use climatology::ClimatologyGenerator;
pub use config::{ClimatologyConfig, PersistenceConfig};
pub use consolidate::{Consolidated, consolidate};
pub use error::BaselineError;
pub use generator::{BaselineGenerator, BaselineWarning, Generated};
pub use persistence::PersistenceGenerator;
pub use search::nth_nearest_earlier;
