/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// Always answers `200 { "status": "ok" }` while the process is serving.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
