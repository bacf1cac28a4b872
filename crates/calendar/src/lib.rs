//! # refcast-calendar
//!
//! UTC calendar arithmetic used to line up historical observations with
//! forecast valid times: the same instant in another year, whole-year lags
//! and aggregation intervals bounded by calendar month-days.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["DateTime&lt;Utc&gt;"] -->|"with_year()"| B["same instant, other year"]
//!     A -->|"lagged_year_interval()"| C["[t - N years, t - (N-1) years)"]
//!     A -->|"month_day_interval()"| D["(start month-day, end month-day]"]
//!     E["MonthDay"] --> D
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::{TimeZone, Utc};
//! use refcast_calendar::{MonthDay, lagged_year_interval, month_day_interval, with_year};
//!
//! let t = Utc.with_ymd_and_hms(1983, 1, 1, 12, 0, 0).unwrap();
//! let earlier = with_year(t, 1980).unwrap();
//!
//! // Persistence window one year back
//! let (lower, upper) = lagged_year_interval(t, 1).unwrap();
//!
//! // April 1 to April 2 of the instant's year
//! let start = MonthDay::new(4, 1).unwrap();
//! let end = MonthDay::new(4, 2).unwrap();
//! let (open, close) = month_day_interval(t, Some(start), Some(end), None).unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `month_day` | Validated month and day pair, leap day permitted |
//! | `shift` | Year replacement, year arithmetic and lagged intervals |
//! | `interval` | Month-day bounded aggregation intervals |
//! | `error` | Error types |

mod error;
mod interval;
mod month_day;
mod shift;

pub use error::CalendarError;
pub use interval::month_day_interval;
pub use month_day::MonthDay;
pub use shift::{lagged_year_interval, minus_years, plus_years, with_year};
