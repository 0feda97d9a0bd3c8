//! Query error types

use thiserror::Error;

/// Errors raised while planning a series query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Series name is not one of temp, humidity, pressure, co2
    #[error("Bad type of value: '{0}' (expected temp, humidity, pressure or co2)")]
    UnknownSeriesType(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
