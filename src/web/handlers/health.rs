//! # Health Check Handlers
//!
//! Kubernetes-compatible liveness endpoint backed by the relational store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    timestamp: String,
}

/// Liveness probe: GET /healthz
///
/// 200 when the database answers, 503 otherwise. The orchestration API is
/// not consulted.
pub async fn liveness_probe(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = state.service.health().await;

    if health.is_reachable() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                message: None,
                timestamp: health.checked_at,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "Database not available".to_string(),
                message: health.message,
                timestamp: health.checked_at,
            }),
        )
    }
}
