//! Health Routes
//!
//! - GET /api/ping - Liveness probe, no dependency checks

use axum::Json;

use crate::api::dto::PingResponse;

/// GET /api/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::default())
}
