//! HTTP handlers for product status endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ListQuery;
use crate::services::status::{CreateStatusInput, Status, StatusService, UpdateStatusInput};
use crate::AppState;

/// List statuses
pub async fn list_statuses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Status>>> {
    let service = StatusService::new(state.db, state.codes);
    let statuses = service.list(&query).await?;
    Ok(Json(statuses))
}

/// Get a status by ID
pub async fn get_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
) -> AppResult<Json<Status>> {
    let service = StatusService::new(state.db, state.codes);
    let status = service.get(status_id).await?;
    Ok(Json(status))
}

/// Create a status
pub async fn create_status(
    State(state): State<AppState>,
    Json(input): Json<CreateStatusInput>,
) -> AppResult<(StatusCode, Json<Status>)> {
    let service = StatusService::new(state.db, state.codes);
    let status = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// Update a status
pub async fn update_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Status>> {
    let service = StatusService::new(state.db, state.codes);
    let status = service.update(status_id, input).await?;
    Ok(Json(status))
}

/// Deactivate a status
pub async fn delete_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = StatusService::new(state.db, state.codes);
    service.deactivate(status_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
