//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::AggregationService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Aggregation pipeline shared by all requests
    pub service: Arc<AggregationService>,
}

impl AppState {
    /// Create a new application state around an aggregation service.
    pub fn new(service: Arc<AggregationService>) -> Self {
        Self { service }
    }
}
