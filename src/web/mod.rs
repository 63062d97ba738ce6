//! # Web API Module
//!
//! Axum routes in front of the coordinator.
//!
//! - [`handlers`] - request handlers for health and check CRUD
//! - [`response_types`] - error taxonomy to HTTP status mapping
//! - [`state`] - shared state and per-request deadlines

pub mod handlers;
pub mod response_types;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use response_types::{ApiError, ApiResult};
pub use state::AppState;

/// Build the router with all routes and the tracing layer.
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::liveness_probe))
        .route("/v1/http-checks", get(handlers::checks::list_checks))
        .route("/v1/http-check", post(handlers::checks::create_check))
        .route(
            "/v1/http-check/{id}",
            get(handlers::checks::get_check)
                .put(handlers::checks::update_check)
                .delete(handlers::checks::delete_check),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
