//! Measurement Routes
//!
//! - POST /api/measurements - Ingest one sample
//! - GET /api/measurements - List samples, optionally for one local date

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::api::dto::{DateFilter, IngestResponse};
use crate::api::envelope::{self, Envelope};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::{Measurement, NewMeasurement, Sample};

/// POST /api/measurements
///
/// Encodes the sample to fixed-point integers and stores it.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Sample>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<IngestResponse>)> {
    let Json(sample) = payload
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e.body_text())))?;

    let measurement = NewMeasurement::encode(&sample, Utc::now())?;
    let id = state.store.insert(measurement.clone()).await?;

    tracing::info!(id, added = %measurement.added, "Stored measurement");

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse::new(measurement, id)),
    ))
}

/// GET /api/measurements
///
/// Without a date: every sample, newest first. With `?date=YYYY-MM-DD`: that
/// local day's samples in ascending order, `added` rendered as `HH:MM`.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DateFilter>,
) -> ApiResult<Json<Envelope<Vec<Measurement>>>> {
    let measurements = match filter.date.as_deref() {
        Some(raw) => state.store.on_date(parse_date(raw)?).await?,
        None => state.store.all().await?,
    };

    Ok(Json(envelope::rows(measurements)))
}

fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation(format!("Bad date: '{}' (expected YYYY-MM-DD)", raw)))
}
