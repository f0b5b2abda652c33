//! Service-level request handlers.

use crate::error::ApiError;
use crate::models::HealthResponse;
use axum::Json;
use axum::http::Uri;

// ============================================================================
// Health Check
// ============================================================================

/// Health check endpoint.
///
/// Reports on this process only; the upstream gateway is not contacted.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Fallback
// ============================================================================

/// Fallback for routes that do not exist or belong to a hidden module.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
