//! Schema bootstrap
//!
//! The measurements table is created once if absent and never altered.
//! Startup verifies that the table exists with every expected column before
//! the server accepts traffic.

use rusqlite::{params, Connection};

use super::error::{StorageError, StorageResult};

/// Name of the measurements table
pub const TABLE_NAME: &str = "measurements";

/// Columns every valid measurements table must have
const EXPECTED_COLUMNS: [&str; 7] = [
    "id",
    "co2",
    "bmp_pressure",
    "bmp_temp",
    "hdc_temp",
    "hdc_hum",
    "added",
];

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    co2 INTEGER,
    bmp_pressure INTEGER,
    bmp_temp INTEGER,
    hdc_temp INTEGER,
    hdc_hum INTEGER,
    added DATETIME NOT NULL
)";

const CREATE_ADDED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_measurements_added ON measurements(added)";

/// Create the table and its index if they do not exist yet
pub fn ensure_schema(conn: &Connection) -> StorageResult<()> {
    let created = !table_exists(conn)?;

    conn.execute(CREATE_TABLE, [])?;
    conn.execute(CREATE_ADDED_INDEX, [])?;

    if created {
        tracing::info!(table = TABLE_NAME, "Created measurements table");
    }

    verify_schema(conn)
}

/// Check that the table exists and carries all expected columns
pub fn verify_schema(conn: &Connection) -> StorageResult<()> {
    if !table_exists(conn)? {
        return Err(StorageError::Schema(format!("table '{}' is missing", TABLE_NAME)));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns: Vec<String> = stmt
        .query_map(params![TABLE_NAME], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let missing: Vec<&str> = EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|expected| !columns.iter().any(|c| c == expected))
        .collect();

    if !missing.is_empty() {
        return Err(StorageError::Schema(format!(
            "table '{}' is missing columns: {}",
            TABLE_NAME,
            missing.join(", ")
        )));
    }

    Ok(())
}

fn table_exists(conn: &Connection) -> StorageResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(name) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![TABLE_NAME],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
