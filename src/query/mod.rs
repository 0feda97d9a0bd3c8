//! Series Query Planning
//!
//! - **series**: public series names and the measurement columns behind them
//! - **planner**: raw vs. downsampled [`QueryPlan`] and its parameterized SQL
//!
//! # Example
//!
//! ```rust
//! use airlog::query::{QueryPlan, SeriesType};
//! use airlog::window::Interval;
//!
//! let series: SeriesType = "co2".parse().unwrap();
//! let interval: Interval = "2w".parse().unwrap();
//!
//! let plan = QueryPlan::for_series(series, Some(interval));
//! assert!(!plan.is_raw());
//! assert_eq!(plan.bucket().width_seconds(), 1800);
//! ```

mod error;
mod planner;
mod series;

pub use error::{QueryError, QueryResult};
pub use planner::{PlannedSql, QueryPlan, LOCAL_MINUTE_FORMAT};
pub use series::{Column, SeriesType};
