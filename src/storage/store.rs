//! Measurement Store
//!
//! Owns the single SQLite connection. The handle is created once at startup,
//! shared behind an `Arc`, and closed explicitly with [`MeasurementStore::shutdown`].
//!
//! Every operation is one statement run on Tokio's blocking pool, so request
//! tasks suspend while SQLite works instead of stalling the runtime.

use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::{StorageError, StorageResult};
use super::schema;
use super::types::{DateRow, Measurement, NewMeasurement, Reading, SeriesRow};
use crate::query::QueryPlan;

/// Number of distinct dates returned by [`MeasurementStore::recent_dates`] callers
pub const RECENT_DATES_LIMIT: u32 = 8;

/// Handle to the measurements database
pub struct MeasurementStore {
    /// std::sync::Mutex because rusqlite::Connection is !Sync; `None` once shut down
    conn: Arc<Mutex<Option<Connection>>>,
    path: PathBuf,
}

impl MeasurementStore {
    /// Open (or create) the database and make sure the schema is in place.
    ///
    /// Fails if the file cannot be opened or the schema cannot be verified.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        schema::ensure_schema(&conn)?;

        tracing::info!(path = %path.display(), "Measurement store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            path,
        })
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| StorageError::Lock(format!("Failed to acquire store lock: {}", e)))?;
            let conn = guard.as_ref().ok_or(StorageError::Closed)?;
            f(conn)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }

    /// Insert one measurement, returning its id
    pub async fn insert(&self, measurement: NewMeasurement) -> StorageResult<i64> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO measurements (co2, bmp_pressure, bmp_temp, hdc_temp, hdc_hum, added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    measurement.co2,
                    measurement.bmp_pressure,
                    measurement.bmp_temp,
                    measurement.hdc_temp,
                    measurement.hdc_hum,
                    measurement.added,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Every row, newest first, with the stored `added` value
    pub async fn all(&self) -> StorageResult<Vec<Measurement>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, co2, bmp_pressure, bmp_temp, hdc_temp, hdc_hum, added
                 FROM measurements
                 ORDER BY added DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([], Measurement::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Rows whose local calendar date is `date`, oldest first, `added` as local `HH:MM`
    pub async fn on_date(&self, date: NaiveDate) -> StorageResult<Vec<Measurement>> {
        let day = date.format("%Y-%m-%d").to_string();

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT m.id AS id, m.co2 AS co2, m.bmp_pressure AS bmp_pressure,
                        m.bmp_temp AS bmp_temp, m.hdc_temp AS hdc_temp, m.hdc_hum AS hdc_hum,
                        strftime('%H:%M', m.added, 'localtime') AS added
                 FROM measurements AS m
                 WHERE strftime('%Y-%m-%d', m.added, 'localtime') = ?1
                 ORDER BY m.added ASC, m.id ASC",
            )?;
            let rows = stmt
                .query_map(params![day], Measurement::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// The most recent row, `added` as local `YYYY-MM-DD HH:MM`; `None` on an empty table
    pub async fn latest(&self) -> StorageResult<Option<Measurement>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT m.id AS id, m.co2 AS co2, m.bmp_pressure AS bmp_pressure,
                        m.bmp_temp AS bmp_temp, m.hdc_temp AS hdc_temp, m.hdc_hum AS hdc_hum,
                        strftime('%Y-%m-%d %H:%M', m.added, 'localtime') AS added
                 FROM measurements AS m
                 ORDER BY m.added DESC, m.id DESC
                 LIMIT 1",
            )?;
            let mut rows = stmt.query_map([], Measurement::from_row)?;
            let latest = rows.next().transpose()?;
            Ok(latest)
        })
        .await
    }

    /// Distinct local dates with data, newest first
    pub async fn recent_dates(&self, limit: u32) -> StorageResult<Vec<DateRow>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT strftime('%Y-%m-%d', m.added, 'localtime') AS day
                 FROM measurements AS m
                 GROUP BY day
                 ORDER BY day DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map(params![limit], |row| Ok(DateRow { added: row.get(0)? }))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Execute a series plan
    pub async fn series(&self, plan: &QueryPlan) -> StorageResult<Vec<SeriesRow>> {
        let planned = plan.to_sql();
        let columns = plan.columns();

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&planned.sql)?;
            let rows = stmt
                .query_map(params_from_iter(planned.params.iter()), |row| {
                    let mut values = BTreeMap::new();
                    for column in columns {
                        values.insert(column.name(), row.get::<_, Option<Reading>>(column.name())?);
                    }
                    Ok(SeriesRow {
                        values,
                        added: row.get("added")?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    /// Number of stored rows
    pub async fn count(&self) -> StorageResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM measurements", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    /// Checkpoint the WAL and close the connection.
    ///
    /// Later calls on this handle fail with [`StorageError::Closed`].
    pub async fn shutdown(&self) -> StorageResult<()> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StorageError::Lock(format!("Failed to acquire store lock: {}", e)))?;

            match guard.take() {
                Some(conn) => {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
                    tracing::info!("Measurement store closed");
                    Ok(())
                }
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}
