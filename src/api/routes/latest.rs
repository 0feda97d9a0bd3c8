//! Latest Sample Route
//!
//! - GET /api/ - Most recent sample plus host identity

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::LatestResponse;
use crate::api::envelope;
use crate::api::error::ApiResult;
use crate::api::host::HostIdentity;
use crate::api::state::AppState;

/// GET /api/
///
/// Returns 404 while the store is empty.
pub async fn latest(State(state): State<Arc<AppState>>) -> ApiResult<Json<LatestResponse>> {
    let latest = envelope::single(state.store.latest().await?)?;
    let host = HostIdentity::detect();

    Ok(Json(LatestResponse {
        status: latest.status,
        data: latest.data,
        ip: host.ip,
        hostname: host.hostname,
    }))
}
