//! Airlog REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Measurements
//! - `POST /api/measurements` - Ingest one sample
//! - `GET /api/measurements` - All samples, or one local day with `?date=YYYY-MM-DD`
//! - `GET /api/measurements/:type` - Full series for `temp`, `humidity`, `pressure` or `co2`
//! - `GET /api/measurements/:type/:history` - Series over a window such as `48h` or `2w`
//!
//! ## Overview
//! - `GET /api/` - Most recent sample plus host identity
//! - `GET /api/dates` - Most recent dates with data
//!
//! ## Health
//! - `GET /api/ping` - Liveness probe
//!
//! Any other path is served from the configured static directory, falling
//! back to its `index.html`.
//!
//! # Example
//!
//! ```rust,no_run
//! use airlog::api::{serve, AppState};
//! use airlog::config::ApiConfig;
//! use airlog::storage::MeasurementStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MeasurementStore::open("./db/app.db")?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(Arc::clone(&store), config.clone());
//!     serve(state, &config).await?;
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod envelope;
pub mod error;
pub mod host;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/ping", get(routes::health::ping))
        .route(
            "/api/measurements",
            get(routes::measurements::list).post(routes::measurements::ingest),
        )
        .route("/api/measurements/:type", get(routes::series::full_series))
        .route(
            "/api/measurements/:type/:history",
            get(routes::series::windowed_series),
        )
        .route("/api/", get(routes::latest::latest))
        .route("/api", get(routes::latest::latest))
        .route("/api/dates", get(routes::dates::recent_dates));

    if let Some(dir) = state.config.static_dir.as_deref() {
        let dir = Path::new(dir);
        tracing::info!("Serving static files from {:?}", dir);
        router = router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        );
    }

    let shared_state = Arc::new(state);

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server and run until a shutdown signal arrives
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let started = state.start_time;
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Airlog API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!(
        uptime_seconds = started.elapsed().as_secs(),
        "Airlog API shut down gracefully"
    );
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MeasurementStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    async fn create_test_app() -> (Router, tempfile::TempDir) {
        create_test_app_with(ApiConfig::default()).await
    }

    async fn create_test_app_with(config: ApiConfig) -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(MeasurementStore::open(dir.path().join("app.db")).unwrap());

        let state = AppState::new(store, config);
        let router = build_router(state);

        (router, dir)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read_json(response).await
    }

    async fn post(app: &Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/measurements")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn minutes_ago(minutes: i64) -> String {
        (Utc::now() - Duration::minutes(minutes))
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _dir) = create_test_app().await;
        let (status, body) = get(&app, "/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Pong"}));
    }

    #[tokio::test]
    async fn test_ingest_then_list() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = post(
            &app,
            r#"{"co2": 412.4, "bmp_pressure": 1013.62, "bmp_temp": 21.345, "hdc_temp": 21.9, "hdc_hum": 40.5}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "success");
        assert_eq!(body["id"], 1);
        assert_eq!(body["measurement"]["co2"], 412.4);
        assert_eq!(body["measurement"]["bmp_pressure"], 1014);
        assert_eq!(body["measurement"]["bmp_temp"], 2135);
        assert_eq!(body["measurement"]["hdc_temp"], 2190);
        assert_eq!(body["measurement"]["hdc_hum"], 4050);

        let (status, body) = get(&app, "/api/measurements").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["bmp_temp"], 2135);
        assert_eq!(rows[0]["co2"], 412.4);
    }

    #[tokio::test]
    async fn test_ingest_invalid_json() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = post(&app, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());

        let (status, _) = post(&app, r#"{"co2": "lots"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ingest_bad_timestamp() {
        let (app, _dir) = create_test_app().await;
        let (status, body) = post(&app, r#"{"co2": 400, "added": "last tuesday"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("last tuesday"));
    }

    #[tokio::test]
    async fn test_unknown_series_type() {
        let (app, _dir) = create_test_app().await;

        for uri in ["/api/measurements/wind", "/api/measurements/wind/5h"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains("type"));
        }
    }

    #[tokio::test]
    async fn test_type_checked_before_interval() {
        let (app, _dir) = create_test_app().await;
        let (status, body) = get(&app, "/api/measurements/wind/5x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("wind"));
    }

    #[tokio::test]
    async fn test_malformed_interval() {
        let (app, _dir) = create_test_app().await;

        for history in ["5x", "abc", "5", "h"] {
            let (status, body) = get(&app, &format!("/api/measurements/co2/{}", history)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "history {}", history);
            assert!(body["error"].as_str().unwrap().contains("interval"));
        }
    }

    #[tokio::test]
    async fn test_empty_series_is_success() {
        let (app, _dir) = create_test_app().await;

        for uri in ["/api/measurements/temp", "/api/measurements/co2/2w"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "success", "data": []}));
        }
    }

    #[tokio::test]
    async fn test_windowed_raw_series() {
        let (app, _dir) = create_test_app().await;

        let old = format!(r#"{{"bmp_temp": 10.0, "hdc_temp": 11.0, "added": "{}"}}"#, minutes_ago(3 * 24 * 60));
        let recent = format!(r#"{{"bmp_temp": 21.5, "hdc_temp": 22.0, "added": "{}"}}"#, minutes_ago(30));
        let newest = format!(r#"{{"bmp_temp": 21.75, "added": "{}"}}"#, minutes_ago(10));
        for body in [&old, &recent, &newest] {
            assert_eq!(post(&app, body).await.0, StatusCode::CREATED);
        }

        let (status, body) = get(&app, "/api/measurements/temp/1h").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["bmp_temp"], 2150);
        assert_eq!(rows[0]["hdc_temp"], 2200);
        assert_eq!(rows[1]["bmp_temp"], 2175);
        assert!(rows[1]["hdc_temp"].is_null());
        assert!(rows[0].get("co2").is_none());

        let (_, body) = get(&app, "/api/measurements/temp").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_windowed_aggregated_series() {
        let (app, _dir) = create_test_app().await;

        // Align to a 30-minute bucket three days back
        let base = (Utc::now() - Duration::days(3)).timestamp();
        let start = base - base.rem_euclid(1800);
        let stamp = |offset: i64| {
            chrono::DateTime::<Utc>::from_timestamp(start + offset, 0)
                .unwrap()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string()
        };

        for (offset, co2) in [(60, 400), (120, 411), (3660, 500)] {
            let body = format!(r#"{{"co2": {}, "added": "{}"}}"#, co2, stamp(offset));
            assert_eq!(post(&app, &body).await.0, StatusCode::CREATED);
        }

        let (status, body) = get(&app, "/api/measurements/co2/2w").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["co2"], 406);
        assert_eq!(rows[1]["co2"], 500);
        assert!(rows[0]["added"].as_str().unwrap() < rows[1]["added"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_ingest_blank_timestamp_is_stamped() {
        let (app, _dir) = create_test_app().await;
        let (status, body) = post(&app, r#"{"co2": 400, "added": ""}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["measurement"]["added"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_latest() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = get(&app, "/api/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        post(&app, r#"{"co2": 500, "hdc_hum": 55.5}"#).await;
        post(&app, r#"{"co2": 600, "hdc_hum": 56.0}"#).await;

        for uri in ["/api/", "/api"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "success");
            assert_eq!(body["data"]["co2"], 600);
            assert_eq!(body["data"]["hdc_hum"], 5600);
            assert!(body["hostname"].is_string());
            assert!(body.get("ip").is_some());
        }
    }

    #[tokio::test]
    async fn test_dates() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = get(&app, "/api/dates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        post(&app, r#"{"co2": 420}"#).await;
        let (_, body) = get(&app, "/api/dates").await;
        let dates = body["data"].as_array().unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0]["added"].as_str().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_list_by_date() {
        let (app, _dir) = create_test_app().await;

        let (status, body) = get(&app, "/api/measurements?date=2024-13-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("date"));

        let (status, body) = get(&app, "/api/measurements?date=2001-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let site = tempdir().unwrap();
        std::fs::write(site.path().join("index.html"), "<html>airlog</html>").unwrap();

        let config = ApiConfig {
            static_dir: Some(site.path().to_string_lossy().to_string()),
            ..ApiConfig::default()
        };
        let (app, _dir) = create_test_app_with(config).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<html>airlog</html>");
    }
}
