//! Interval tokens
//!
//! Grammar: one or more ASCII digits followed by exactly one unit letter.
//!
//! ```text
//! 12h  -> 12 hours
//! 3d   -> 3 days
//! 2w   -> 2 weeks
//! 6m   -> 6 calendar months
//! 1y   -> 1 calendar year
//! ```

use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::{WindowError, WindowResult};

const INTERVAL_PATTERN: &str = r"^([0-9]+)([hdwmy])$";

fn interval_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(INTERVAL_PATTERN).expect("interval pattern is valid"))
}

/// Unit of an interval token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Day,
    Week,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
}

impl TimeUnit {
    /// Map a unit letter to its unit
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'h' => Some(Self::Hour),
            'd' => Some(Self::Day),
            'w' => Some(Self::Week),
            'm' => Some(Self::Month),
            'y' => Some(Self::Year),
            _ => None,
        }
    }

    /// The letter used for this unit in interval tokens
    pub fn letter(&self) -> char {
        match self {
            Self::Hour => 'h',
            Self::Day => 'd',
            Self::Week => 'w',
            Self::Month => 'm',
            Self::Year => 'y',
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// A parsed `<count><unit>` interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    /// Number of units; `0` is accepted and denotes an empty window
    pub count: u64,
    pub unit: TimeUnit,
}

impl Interval {
    pub fn new(count: u64, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    /// Parse an interval token.
    ///
    /// There is no upper bound on the count. Digit strings that do not fit
    /// in a `u64` saturate at `u64::MAX`.
    pub fn parse(token: &str) -> WindowResult<Self> {
        let caps = interval_regex()
            .captures(token)
            .ok_or_else(|| WindowError::InvalidInterval(token.to_string()))?;

        // The pattern only admits ASCII digits, so overflow is the only failure
        let count = caps[1].parse::<u64>().unwrap_or(u64::MAX);

        let unit = caps[2]
            .chars()
            .next()
            .and_then(TimeUnit::from_letter)
            .ok_or_else(|| WindowError::InvalidInterval(token.to_string()))?;

        Ok(Self { count, unit })
    }
}

impl FromStr for Interval {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit.letter())
    }
}
