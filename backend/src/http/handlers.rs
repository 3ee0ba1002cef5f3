//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! aggregation service for business logic.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::dto::{AggregationResult, ExoplanetQuery, HealthResponse};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Exoplanet Neighbourhood
// =============================================================================

/// GET /exoplanet?name=<name>
///
/// Resolve the named exoplanet and the objects considered nearby.
pub async fn get_exoplanet(
    State(state): State<AppState>,
    Query(params): Query<ExoplanetQuery>,
) -> HandlerResult<AggregationResult> {
    let name = params.name.unwrap_or_default();
    let span = info_span!("exoplanet", request_id = %Uuid::new_v4(), name = %name.trim());

    async move {
        match state.service.aggregate(&name).await {
            Ok(result) => {
                info!("Resolved target with {} nearby objects", result.nearby_count());
                Ok(Json(result))
            }
            Err(e) => {
                if !e.is_upstream() {
                    warn!("Request rejected: {}", e);
                }
                Err(AppError::from(e))
            }
        }
    }
    .instrument(span)
    .await
}
