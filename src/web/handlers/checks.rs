//! # HTTP Check Handlers
//!
//! CRUD endpoints for check definitions. Each handler derives a fresh
//! deadline from [`AppState::operation_context`] and hands it to the
//! coordinator.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{HttpCheck, HttpCheckDefinition};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::invalid_uuid(raw))
}

/// List checks: GET /v1/http-checks
pub async fn list_checks(State(state): State<AppState>) -> ApiResult<Json<Vec<HttpCheck>>> {
    let ctx = state.operation_context();
    let checks = state.service.list(&ctx).await?;
    debug!(count = checks.len(), "Listed HTTP checks");
    Ok(Json(checks))
}

/// Fetch one check: GET /v1/http-check/{id}
pub async fn get_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HttpCheck>> {
    let id = parse_id(&id)?;
    let ctx = state.operation_context();

    match state.service.get(id, &ctx).await? {
        Some(check) => Ok(Json(check)),
        None => Err(ApiError::not_found("HTTP Check not found")),
    }
}

/// Create a check: POST /v1/http-check
pub async fn create_check(
    State(state): State<AppState>,
    body: Result<Json<HttpCheckDefinition>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HttpCheck>)> {
    let Json(definition) = body?;
    info!(name = %definition.name, uri = %definition.uri, "Creating HTTP check via web API");

    let ctx = state.operation_context();
    let created = state.service.create(definition, &ctx).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a check: PUT /v1/http-check/{id}
pub async fn update_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<HttpCheckDefinition>, JsonRejection>,
) -> ApiResult<Json<HttpCheck>> {
    let id = parse_id(&id)?;
    let Json(definition) = body?;
    info!(id = %id, name = %definition.name, "Updating HTTP check via web API");

    let ctx = state.operation_context();
    let updated = state.service.update(id, definition, &ctx).await?;
    Ok(Json(updated))
}

/// Remove a check: DELETE /v1/http-check/{id}
pub async fn delete_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    info!(id = %id, "Deleting HTTP check via web API");

    let ctx = state.operation_context();
    state.service.delete(id, &ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}
