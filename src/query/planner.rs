//! Query Planner
//!
//! Chooses between two query shapes:
//!
//! ```text
//! Raw:        SELECT cols, added  WHERE added > cutoff  ORDER BY added
//! Aggregated: SELECT ROUND(AVG(col)).., MIN(added)  WHERE added > cutoff
//!             GROUP BY floor(epoch_seconds(added) / width)
//! ```
//!
//! Values are always passed as bound parameters. Only column names from the
//! closed [`Column`] set are written into the statement text.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;

use super::series::{Column, SeriesType};
use crate::storage::TABLE_NAME;
use crate::window::{Bucket, Interval, TimeWindow, CUTOFF_FORMAT};

/// SQLite `strftime` pattern for timestamps returned by series queries
pub const LOCAL_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Epoch seconds of a stored row
const EPOCH: &str = "CAST(strftime('%s', m.added) AS INTEGER)";

/// Shape of a series read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Individual rows in ascending time order
    Raw {
        columns: &'static [Column],
        cutoff: Option<DateTime<Utc>>,
    },
    /// Rounded per-bucket means, sparse, ascending by bucket
    Aggregated {
        columns: &'static [Column],
        cutoff: DateTime<Utc>,
        bucket: Bucket,
    },
}

/// Statement text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryPlan {
    /// Combine a column set, an optional window and a bucket.
    ///
    /// Without a window, or with a raw bucket, the plan is a raw scan.
    pub fn new(columns: &'static [Column], window: Option<TimeWindow>, bucket: Bucket) -> Self {
        match window {
            Some(window) if !bucket.is_raw() => Self::Aggregated {
                columns,
                cutoff: window.cutoff,
                bucket,
            },
            window => Self::Raw {
                columns,
                cutoff: window.map(|w| w.cutoff),
            },
        }
    }

    /// Plan a series request against the current wall clock
    pub fn for_series(series: SeriesType, interval: Option<Interval>) -> Self {
        Self::for_series_at(series, interval, Utc::now())
    }

    /// Plan a series request against an explicit `now`
    pub fn for_series_at(
        series: SeriesType,
        interval: Option<Interval>,
        now: DateTime<Utc>,
    ) -> Self {
        let window = interval.map(|i| TimeWindow::resolve_at(i, now));
        let bucket = Bucket::for_request(interval.as_ref());
        Self::new(series.columns(), window, bucket)
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::Raw { columns, .. } | Self::Aggregated { columns, .. } => columns,
        }
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Raw { cutoff, .. } => *cutoff,
            Self::Aggregated { cutoff, .. } => Some(*cutoff),
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Raw { .. } => Bucket::RAW,
            Self::Aggregated { bucket, .. } => *bucket,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }

    /// Render the plan as a parameterized SQLite statement
    pub fn to_sql(&self) -> PlannedSql {
        match self {
            Self::Raw { columns, cutoff } => {
                let mut select: Vec<String> = columns
                    .iter()
                    .map(|c| format!("m.{0} AS {0}", c.name()))
                    .collect();
                select.push(format!(
                    "strftime('{}', m.added, 'localtime') AS added",
                    LOCAL_MINUTE_FORMAT
                ));

                let mut sql = format!("SELECT {} FROM {} AS m", select.join(", "), TABLE_NAME);
                let mut params = Vec::new();

                if let Some(cutoff) = cutoff {
                    sql.push_str(" WHERE m.added > ?1");
                    params.push(Value::Text(cutoff.format(CUTOFF_FORMAT).to_string()));
                }
                sql.push_str(" ORDER BY m.added ASC, m.id ASC");

                PlannedSql { sql, params }
            }
            Self::Aggregated {
                columns,
                cutoff,
                bucket,
            } => {
                let mut select: Vec<String> = columns
                    .iter()
                    .map(|c| format!("CAST(ROUND(AVG(m.{0})) AS INTEGER) AS {0}", c.name()))
                    .collect();
                select.push(format!(
                    "strftime('{}', MIN(m.added), 'localtime') AS added",
                    LOCAL_MINUTE_FORMAT
                ));

                // SQLite `/` truncates toward zero; subtract the euclidean
                // remainder first so pre-1970 rows floor into their own bucket.
                let sql = format!(
                    "SELECT {select} FROM {table} AS m \
                     WHERE m.added > ?1 \
                     GROUP BY ({epoch} - (({epoch} % ?2) + ?2) % ?2) / ?2 \
                     ORDER BY MIN(m.added) ASC",
                    select = select.join(", "),
                    table = TABLE_NAME,
                    epoch = EPOCH,
                );

                PlannedSql {
                    sql,
                    params: vec![
                        Value::Text(cutoff.format(CUTOFF_FORMAT).to_string()),
                        Value::Integer(i64::from(bucket.width_seconds())),
                    ],
                }
            }
        }
    }
}

impl std::fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw { .. } => write!(f, "raw"),
            Self::Aggregated { bucket, .. } => write!(f, "aggregated/{}s", bucket.width_seconds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    fn plan(series: &str, history: Option<&str>) -> QueryPlan {
        let series = SeriesType::parse(series).unwrap();
        let interval = history.map(|h| Interval::parse(h).unwrap());
        QueryPlan::for_series_at(series, interval, now())
    }

    #[test]
    fn test_short_hour_window_is_raw() {
        let plan = plan("temp", Some("5h"));
        assert_eq!(
            plan,
            QueryPlan::Raw {
                columns: &[Column::BmpTemp, Column::HdcTemp],
                cutoff: Some(Utc.with_ymd_and_hms(2024, 5, 15, 7, 0, 0).unwrap()),
            }
        );
        assert_eq!(plan.bucket(), Bucket::RAW);
    }

    #[test]
    fn test_long_hour_window_is_aggregated() {
        let plan = plan("temp", Some("48h"));
        assert!(!plan.is_raw());
        assert_eq!(plan.bucket().width_seconds(), 300);
        assert_eq!(plan.columns(), &[Column::BmpTemp, Column::HdcTemp]);
    }

    #[test]
    fn test_week_window_uses_half_hour_buckets() {
        let plan = plan("co2", Some("2w"));
        assert_eq!(
            plan,
            QueryPlan::Aggregated {
                columns: &[Column::Co2],
                cutoff: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                bucket: Bucket::seconds(1800),
            }
        );
    }

    #[test]
    fn test_no_history_is_unbounded_raw() {
        let plan = plan("humidity", None);
        assert_eq!(
            plan,
            QueryPlan::Raw {
                columns: &[Column::HdcHum],
                cutoff: None,
            }
        );

        let sql = plan.to_sql();
        assert!(!sql.sql.contains("WHERE"));
        assert!(sql.params.is_empty());
    }

    #[test]
    fn test_raw_sql_binds_cutoff() {
        let sql = plan("pressure", Some("12h")).to_sql();
        assert_eq!(
            sql.sql,
            "SELECT m.bmp_pressure AS bmp_pressure, \
             strftime('%Y-%m-%d %H:%M', m.added, 'localtime') AS added \
             FROM measurements AS m WHERE m.added > ?1 ORDER BY m.added ASC, m.id ASC"
        );
        assert_eq!(sql.params, vec![Value::Text("2024-05-15T00:00:00.000Z".to_string())]);
    }

    #[test]
    fn test_aggregated_sql_binds_cutoff_and_width() {
        let sql = plan("temp", Some("3d")).to_sql();
        assert!(sql.sql.contains("CAST(ROUND(AVG(m.bmp_temp)) AS INTEGER) AS bmp_temp"));
        assert!(sql.sql.contains("CAST(ROUND(AVG(m.hdc_temp)) AS INTEGER) AS hdc_temp"));
        assert!(sql.sql.contains(
            "GROUP BY (CAST(strftime('%s', m.added) AS INTEGER) - \
             ((CAST(strftime('%s', m.added) AS INTEGER) % ?2) + ?2) % ?2) / ?2"
        ));
        assert!(!sql.sql.contains("2024-05-12"));
        assert_eq!(
            sql.params,
            vec![
                Value::Text("2024-05-12T12:00:00.000Z".to_string()),
                Value::Integer(600),
            ]
        );
    }

    #[test]
    fn test_window_with_raw_bucket_stays_raw() {
        let window = TimeWindow::resolve_at(Interval::new(1, crate::window::TimeUnit::Day), now());
        let plan = QueryPlan::new(SeriesType::Co2.columns(), Some(window), Bucket::RAW);
        assert!(plan.is_raw());
        assert_eq!(plan.cutoff(), Some(window.cutoff));
    }

    #[test]
    fn test_display() {
        assert_eq!(plan("co2", Some("1y")).to_string(), "aggregated/43200s");
        assert_eq!(plan("co2", Some("1h")).to_string(), "raw");
    }
}
