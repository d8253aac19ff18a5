//! HTTP handlers for repair status endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ListQuery;
use crate::services::repair_status::{
    CreateRepairStatusInput, RepairStatus, RepairStatusService, UpdateRepairStatusInput,
};
use crate::AppState;

/// List repair statuses
pub async fn list_repair_statuses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<RepairStatus>>> {
    let service = RepairStatusService::new(state.db);
    let statuses = service.list(&query).await?;
    Ok(Json(statuses))
}

pub async fn get_repair_status(
    State(state): State<AppState>,
    Path(repair_status_id): Path<Uuid>,
) -> AppResult<Json<RepairStatus>> {
    let service = RepairStatusService::new(state.db);
    let status = service.get(repair_status_id).await?;
    Ok(Json(status))
}

pub async fn create_repair_status(
    State(state): State<AppState>,
    Json(input): Json<CreateRepairStatusInput>,
) -> AppResult<(StatusCode, Json<RepairStatus>)> {
    let service = RepairStatusService::new(state.db);
    let status = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

pub async fn update_repair_status(
    State(state): State<AppState>,
    Path(repair_status_id): Path<Uuid>,
    Json(input): Json<UpdateRepairStatusInput>,
) -> AppResult<Json<RepairStatus>> {
    let service = RepairStatusService::new(state.db);
    let status = service.update(repair_status_id, input).await?;
    Ok(Json(status))
}

/// Deactivate a repair status
pub async fn delete_repair_status(
    State(state): State<AppState>,
    Path(repair_status_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = RepairStatusService::new(state.db);
    service.deactivate(repair_status_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
