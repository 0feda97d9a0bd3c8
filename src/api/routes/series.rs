//! Series Routes
//!
//! - GET /api/measurements/:type - Full raw series
//! - GET /api/measurements/:type/:history - Windowed, possibly downsampled
//!
//! The series type is checked before the history token, so a request wrong
//! in both reports the type.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::envelope::{self, Envelope};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::{QueryPlan, SeriesType};
use crate::storage::SeriesRow;
use crate::window::Interval;

/// GET /api/measurements/:type
pub async fn full_series(
    State(state): State<Arc<AppState>>,
    Path(series): Path<String>,
) -> ApiResult<Json<Envelope<Vec<SeriesRow>>>> {
    run(&state, &series, None).await
}

/// GET /api/measurements/:type/:history
pub async fn windowed_series(
    State(state): State<Arc<AppState>>,
    Path((series, history)): Path<(String, String)>,
) -> ApiResult<Json<Envelope<Vec<SeriesRow>>>> {
    run(&state, &series, Some(&history)).await
}

async fn run(
    state: &AppState,
    series: &str,
    history: Option<&str>,
) -> ApiResult<Json<Envelope<Vec<SeriesRow>>>> {
    let series = SeriesType::parse(series)?;
    let interval = history.map(Interval::parse).transpose()?;

    let plan = QueryPlan::for_series(series, interval);
    let rows = state.store.series(&plan).await?;

    tracing::debug!(
        series = %series,
        plan = %plan,
        rows = rows.len(),
        "Series query"
    );

    Ok(Json(envelope::rows(rows)))
}
