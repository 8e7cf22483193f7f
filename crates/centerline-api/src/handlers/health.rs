use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Ready once the store answers a point lookup.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store.find_center(Uuid::nil()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Readiness probe failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
