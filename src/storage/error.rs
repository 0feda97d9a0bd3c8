//! Storage error types
//!
//! Defines all errors that can occur at the measurement store boundary.

use thiserror::Error;

/// Errors that can occur in the measurement store
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite reported an error
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema could not be created or does not match
    #[error("Schema error: {0}")]
    Schema(String),

    /// Caller supplied an `added` value that is not a timestamp
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// Connection lock was poisoned
    #[error("Lock error: {0}")]
    Lock(String),

    /// Blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// Store has been shut down
    #[error("Store is closed")]
    Closed,
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
