use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::repositories::ArtifactStore;

/// Shared state for the readiness probe
pub struct HealthState {
    pub store: Arc<ArtifactStore>,
    pub provider: &'static str,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    if state.store.is_available().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "storage": "available",
                "tts": state.provider
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "storage": "unavailable",
                "tts": state.provider
            })),
        )
    }
}
