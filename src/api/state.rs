//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::storage::MeasurementStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Measurement store backing every endpoint
    pub store: Arc<MeasurementStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<MeasurementStore>, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
