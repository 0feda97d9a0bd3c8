//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not plain
//! [`Envelope`](crate::api::envelope::Envelope)s.

use serde::{Deserialize, Serialize};

use crate::storage::{Measurement, NewMeasurement};

/// Liveness response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub response: &'static str,
}

impl Default for PingResponse {
    fn default() -> Self {
        Self { response: "Pong" }
    }
}

/// Ingest response: the encoded values as stored, plus the new row id
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    pub measurement: NewMeasurement,
    pub id: i64,
}

impl IngestResponse {
    pub fn new(measurement: NewMeasurement, id: i64) -> Self {
        Self {
            message: "success",
            measurement,
            id,
        }
    }
}

/// Query string of `GET /api/measurements`
#[derive(Debug, Default, Deserialize)]
pub struct DateFilter {
    /// Local calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

/// Most recent sample together with the identity of the serving host
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub status: &'static str,
    pub data: Measurement,
    pub ip: Option<String>,
    pub hostname: String,
}
