//! Downsample bucket selection
//!
//! The bucket width depends only on the requested interval, never on how
//! many rows the window actually holds.
//!
//! | unit  | count | width  |
//! |-------|-------|--------|
//! | hour  | <= 12 | raw    |
//! | hour  | > 12  | 300 s  |
//! | day   | any   | 600 s  |
//! | week  | any   | 1800 s |
//! | month | any   | 3600 s |
//! | year  | any   | 43200 s|

use serde::Serialize;

use super::interval::{Interval, TimeUnit};

/// Largest hour count still served at native resolution
const RAW_HOUR_LIMIT: u64 = 12;

/// Width of a downsample bucket in seconds; zero means raw rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Bucket {
    width_seconds: u32,
}

impl Bucket {
    /// No bucketing
    pub const RAW: Bucket = Bucket { width_seconds: 0 };

    pub const fn seconds(width_seconds: u32) -> Self {
        Self { width_seconds }
    }

    /// Select the bucket for an interval
    pub fn for_interval(interval: &Interval) -> Self {
        match interval.unit {
            TimeUnit::Hour if interval.count <= RAW_HOUR_LIMIT => Self::RAW,
            TimeUnit::Hour => Self::seconds(300),
            TimeUnit::Day => Self::seconds(600),
            TimeUnit::Week => Self::seconds(1800),
            TimeUnit::Month => Self::seconds(3600),
            TimeUnit::Year => Self::seconds(43_200),
        }
    }

    /// Select the bucket for an optional interval; no interval means raw
    pub fn for_request(interval: Option<&Interval>) -> Self {
        interval.map(Self::for_interval).unwrap_or(Self::RAW)
    }

    pub fn width_seconds(&self) -> u32 {
        self.width_seconds
    }

    pub fn is_raw(&self) -> bool {
        self.width_seconds == 0
    }
}
