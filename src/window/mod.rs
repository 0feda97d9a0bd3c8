//! Time Window Engine
//!
//! Turns a relative interval token such as `12h` or `3w` into the two values
//! a series query needs:
//!
//! - **interval**: parse `<count><unit>` into an [`Interval`]
//! - **resolver**: subtract the interval from "now" to get a [`TimeWindow`] cutoff
//! - **bucket**: pick the downsample [`Bucket`] width for the interval
//!
//! # Example
//!
//! ```rust
//! use airlog::window::{Bucket, Interval, TimeUnit};
//!
//! let interval: Interval = "2w".parse().unwrap();
//! assert_eq!(interval.unit, TimeUnit::Week);
//!
//! let bucket = Bucket::for_interval(&interval);
//! assert_eq!(bucket.width_seconds(), 1800);
//!
//! let window = interval.window();
//! assert!(window.cutoff <= chrono::Utc::now());
//! ```

mod bucket;
mod error;
mod interval;
mod resolver;

pub use bucket::Bucket;
pub use error::{WindowError, WindowResult};
pub use interval::{Interval, TimeUnit};
pub use resolver::{TimeWindow, CUTOFF_FORMAT};
