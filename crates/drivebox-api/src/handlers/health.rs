//! Health check handler.

use axum::Json;

use crate::dto::response::HealthResponse;

/// GET /api/health — liveness probe, no authentication
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
