//! Response Envelopes
//!
//! Every successful read is wrapped as `{"status": "success", "data": ...}`.
//!
//! Two fetch shapes exist:
//! - multi-row: a `Vec`, always a success, possibly empty
//! - single-row: an `Option`, where `None` becomes a 404

use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};

const SUCCESS: &str = "success";

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: SUCCESS,
            data,
        }
    }
}

/// Wrap a multi-row result; an empty set is still a success
pub fn rows<T>(rows: Vec<T>) -> Envelope<Vec<T>> {
    Envelope::success(rows)
}

/// Wrap a single-row result; an absent row is [`ApiError::NotFound`]
pub fn single<T>(row: Option<T>) -> ApiResult<Envelope<T>> {
    row.map(Envelope::success)
        .ok_or_else(|| ApiError::NotFound("No data in DB".to_string()))
}
