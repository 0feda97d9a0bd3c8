//! Date Routes
//!
//! - GET /api/dates - Most recent local dates that have samples

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::envelope::{self, Envelope};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::storage::store::RECENT_DATES_LIMIT;
use crate::storage::DateRow;

/// GET /api/dates
///
/// Up to eight distinct dates, newest first.
pub async fn recent_dates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<DateRow>>>> {
    let dates = state.store.recent_dates(RECENT_DATES_LIMIT).await?;
    Ok(Json(envelope::rows(dates)))
}
