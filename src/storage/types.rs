//! Measurement types
//!
//! - `Sample`: floating-point readings as posted by a sensor node
//! - `NewMeasurement`: a sample encoded for storage
//! - `Measurement`: a stored row
//! - `SeriesRow` / `DateRow`: rows produced by series and date queries
//!
//! Temperatures and humidity are stored as fixed-point integers with two
//! implied decimals (`21.345` → `2135`). Pressure is rounded to whole units.
//! CO2 is stored as received.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{StorageError, StorageResult};

/// Canonical storage format of `added` (UTC, millisecond precision)
pub const ADDED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A numeric cell as SQLite returns it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Integer(i64),
    Real(f64),
}

impl Reading {
    /// Integral values become `Integer`, anything else stays `Real`
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
            Reading::Integer(value as i64)
        } else {
            Reading::Real(value)
        }
    }
}

impl FromSql for Reading {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Reading::Integer(i)),
            ValueRef::Real(f) => Ok(Reading::Real(f)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for Reading {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match *self {
            Reading::Integer(i) => ToSqlOutput::from(i),
            Reading::Real(f) => ToSqlOutput::from(f),
        })
    }
}

/// Raw sensor sample as posted to the ingest endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub co2: Option<f64>,
    #[serde(default)]
    pub bmp_pressure: Option<f64>,
    #[serde(default)]
    pub bmp_temp: Option<f64>,
    #[serde(default)]
    pub hdc_temp: Option<f64>,
    #[serde(default)]
    pub hdc_hum: Option<f64>,
    /// ISO-8601 timestamp; defaults to ingestion time
    #[serde(default)]
    pub added: Option<String>,
}

/// A sample encoded for insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeasurement {
    pub co2: Option<Reading>,
    pub bmp_pressure: Option<i64>,
    pub bmp_temp: Option<i64>,
    pub hdc_temp: Option<i64>,
    pub hdc_hum: Option<i64>,
    pub added: String,
}

impl NewMeasurement {
    /// Encode a sample, stamping it with `now` when its timestamp is absent or blank
    pub fn encode(sample: &Sample, now: DateTime<Utc>) -> StorageResult<Self> {
        let added = match sample.added.as_deref().filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => normalize_timestamp(raw)?,
            None => now.format(ADDED_FORMAT).to_string(),
        };

        Ok(Self {
            co2: sample.co2.map(Reading::from_f64),
            bmp_pressure: sample.bmp_pressure.map(|v| v.round() as i64),
            bmp_temp: sample.bmp_temp.map(hundredths),
            hdc_temp: sample.hdc_temp.map(hundredths),
            hdc_hum: sample.hdc_hum.map(hundredths),
            added,
        })
    }
}

/// Fixed-point encoding with two implied decimals, rounding half away from zero
fn hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Parse a caller-supplied timestamp and render it in [`ADDED_FORMAT`].
///
/// Accepts RFC 3339 with any offset, or a naive date-time (`T` or space
/// separated, optional fraction) which is taken as UTC.
pub fn normalize_timestamp(raw: &str) -> StorageResult<String> {
    let trimmed = raw.trim();

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .map_err(|_| StorageError::InvalidTimestamp(raw.to_string()))?;

    Ok(parsed.format(ADDED_FORMAT).to_string())
}

/// A stored measurement row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub bmp_pressure: Option<Reading>,
    pub bmp_temp: Option<Reading>,
    pub hdc_temp: Option<Reading>,
    pub hdc_hum: Option<Reading>,
    pub co2: Option<Reading>,
    /// Stored timestamp, or a local-time rendering depending on the query
    pub added: String,
}

impl Measurement {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            bmp_pressure: row.get("bmp_pressure")?,
            bmp_temp: row.get("bmp_temp")?,
            hdc_temp: row.get("hdc_temp")?,
            hdc_hum: row.get("hdc_hum")?,
            co2: row.get("co2")?,
            added: row.get("added")?,
        })
    }
}

/// One point of a series: the selected columns plus a local minute timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    #[serde(flatten)]
    pub values: BTreeMap<&'static str, Option<Reading>>,
    pub added: String,
}

impl SeriesRow {
    pub fn get(&self, column: &str) -> Option<Reading> {
        self.values.get(column).copied().flatten()
    }
}

/// A local calendar date that has at least one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRow {
    pub added: String,
}
