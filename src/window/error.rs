//! Time window error types

use thiserror::Error;

/// Errors raised while interpreting an interval token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Token does not match `^[0-9]+[hdwmy]$`
    #[error("Bad interval: '{0}' (expected <count><h|d|w|m|y>)")]
    InvalidInterval(String),
}

/// Result type for time window operations
pub type WindowResult<T> = Result<T, WindowError>;
