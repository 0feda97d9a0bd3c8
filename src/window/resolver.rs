//! Cutoff resolution
//!
//! Hours, days and weeks are fixed durations. Months and years are calendar
//! arithmetic: the day of month is clamped to the last valid day of the
//! target month, so `2024-03-31 - 1m` is `2024-02-29`.

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::Serialize;

use super::interval::{Interval, TimeUnit};

/// Rendering of a cutoff used as a filter boundary (matches stored `added`)
pub const CUTOFF_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 0000-01-01T00:00:00Z, the earliest cutoff ever produced
const FLOOR_EPOCH_SECONDS: i64 = -62_167_219_200;

/// An interval anchored to an instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub interval: Interval,
    /// Samples at or before this instant are excluded
    pub cutoff: DateTime<Utc>,
}

impl TimeWindow {
    /// Resolve against the current wall clock
    pub fn resolve(interval: Interval) -> Self {
        Self::resolve_at(interval, Utc::now())
    }

    /// Resolve against an explicit `now`.
    ///
    /// Spans too large to represent saturate at year 0.
    pub fn resolve_at(interval: Interval, now: DateTime<Utc>) -> Self {
        let floor = floor_instant();
        let cutoff = subtract(now, interval)
            .map(|cutoff| cutoff.max(floor))
            .unwrap_or(floor);

        Self { interval, cutoff }
    }

    /// Millisecond-precision ISO-8601 rendering of the cutoff
    pub fn cutoff_string(&self) -> String {
        self.cutoff.format(CUTOFF_FORMAT).to_string()
    }
}

fn subtract(now: DateTime<Utc>, interval: Interval) -> Option<DateTime<Utc>> {
    let count = interval.count;

    match interval.unit {
        TimeUnit::Hour => now.checked_sub_signed(TimeDelta::try_hours(i64::try_from(count).ok()?)?),
        TimeUnit::Day => now.checked_sub_signed(TimeDelta::try_days(i64::try_from(count).ok()?)?),
        TimeUnit::Week => now.checked_sub_signed(TimeDelta::try_weeks(i64::try_from(count).ok()?)?),
        TimeUnit::Month => now.checked_sub_months(Months::new(u32::try_from(count).ok()?)),
        TimeUnit::Year => {
            let months = u32::try_from(count).ok()?.checked_mul(12)?;
            now.checked_sub_months(Months::new(months))
        }
    }
}

fn floor_instant() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FLOOR_EPOCH_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Interval {
    /// Anchor this interval at the current wall clock
    pub fn window(&self) -> TimeWindow {
        TimeWindow::resolve(*self)
    }
}
