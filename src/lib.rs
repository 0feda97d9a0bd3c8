//! # Airlog
//!
//! Logging service for an indoor environmental sensor node. Samples of CO2,
//! barometric pressure, two temperatures and relative humidity are posted over
//! HTTP, stored in SQLite and served back as raw or downsampled series for a
//! dashboard.
//!
//! ## Modules
//!
//! - [`window`]: Interval tokens, lookback windows and bucket widths
//! - [`query`]: Series types and query plans
//! - [`storage`]: SQLite measurement store
//! - [`api`]: REST API server with Axum
//! - [`config`]: File and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use airlog::query::{QueryPlan, SeriesType};
//! use airlog::storage::{MeasurementStore, NewMeasurement, Sample};
//! use airlog::window::Interval;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MeasurementStore::open("./db/app.db")?;
//!
//!     let sample = Sample { co2: Some(415.0), hdc_temp: Some(21.4), ..Default::default() };
//!     store.insert(NewMeasurement::encode(&sample, chrono::Utc::now())?).await?;
//!
//!     // Last two days of temperatures, averaged into 5-minute buckets
//!     let plan = QueryPlan::for_series(SeriesType::Temp, Some(Interval::parse("48h")?));
//!     let rows = store.series(&plan).await?;
//!     println!("{} points ({})", rows.len(), plan);
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod query;
pub mod storage;
pub mod window;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};
pub use config::{Config, ConfigError};
pub use query::{QueryError, QueryPlan, SeriesType};
pub use storage::{MeasurementStore, StorageError, StorageResult};
pub use window::{Bucket, Interval, TimeWindow, WindowError};
