//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AggregateError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Resource not found
    NotFound(String),
    /// Catalog unreachable or answered badly; details stay in the logs
    Upstream,
    /// Catalog did not answer in time
    UpstreamTimeout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Upstream => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("UPSTREAM_ERROR", "Error fetching data from the catalog service"),
            ),
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("UPSTREAM_TIMEOUT", "The catalog service did not respond in time"),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<AggregateError> for AppError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::InvalidArgument(e) => AppError::BadRequest(e.to_string()),
            AggregateError::TargetNotFound { .. } => {
                AppError::NotFound("No data found for this exoplanet!".to_string())
            }
            AggregateError::NoCandidates { .. } => {
                AppError::NotFound("No nearby objects found.".to_string())
            }
            AggregateError::Timeout { .. } => AppError::UpstreamTimeout,
            AggregateError::Upstream { .. } | AggregateError::MalformedResponse { .. } => {
                AppError::Upstream
            }
        }
    }
}
