//! Measurement Storage
//!
//! A single append-only SQLite table holding one row per sensor sample:
//!
//! - **types**: sample encoding (`Sample` → `NewMeasurement`) and row types
//! - **schema**: table creation and verification at startup
//! - **store**: the owned [`MeasurementStore`] handle
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use airlog::storage::{MeasurementStore, NewMeasurement, Sample};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MeasurementStore::open("./db/app.db")?;
//!
//!     let sample = Sample { co2: Some(412.0), hdc_temp: Some(21.9), ..Default::default() };
//!     let id = store.insert(NewMeasurement::encode(&sample, chrono::Utc::now())?).await?;
//!
//!     let latest = store.latest().await?;
//!     assert_eq!(latest.map(|m| m.id), Some(id));
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use schema::TABLE_NAME;
pub use store::MeasurementStore;
pub use types::{DateRow, Measurement, NewMeasurement, Reading, Sample, SeriesRow, ADDED_FORMAT};
