//! Liveness endpoint.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /health` — reports the server is up. Does not contact the provider.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: askai_core::version(),
    })
}
