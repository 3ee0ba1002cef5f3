//! Data Transfer Objects for the HTTP API.
//!
//! The success body of `/exoplanet` is [`AggregationResult`] itself; only the
//! request parameters and auxiliary responses are defined here.

use serde::{Deserialize, Serialize};

pub use crate::models::{AggregationResult, CelestialRecord};

/// Query parameters for `GET /exoplanet`.
///
/// `name` is optional at the extractor level so a missing parameter becomes
/// our own 400 body instead of axum's rejection text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExoplanetQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
