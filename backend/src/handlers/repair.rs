//! HTTP handlers for repair log endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::repair::{
    CreateRepairInput, RepairLog, RepairMovement, RepairService, UpdateRepairInput,
};
use crate::AppState;

/// Query parameters for listing repairs
#[derive(Debug, Deserialize)]
pub struct ListRepairsQuery {
    pub product_id: Option<Uuid>,
}

/// List repair logs
pub async fn list_repairs(
    State(state): State<AppState>,
    Query(query): Query<ListRepairsQuery>,
) -> AppResult<Json<Vec<RepairLog>>> {
    let service = RepairService::new(state.db);
    let repairs = service.list(query.product_id).await?;
    Ok(Json(repairs))
}

/// Get a repair log by ID
pub async fn get_repair(
    State(state): State<AppState>,
    Path(repair_id): Path<Uuid>,
) -> AppResult<Json<RepairLog>> {
    let service = RepairService::new(state.db);
    let repair = service.get(repair_id).await?;
    Ok(Json(repair))
}

/// Open a repair log
pub async fn create_repair(
    State(state): State<AppState>,
    Json(input): Json<CreateRepairInput>,
) -> AppResult<(StatusCode, Json<RepairLog>)> {
    let service = RepairService::new(state.db);
    let repair = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(repair)))
}

/// Update a repair log. The product takes the status mapped from the
/// repair status, if any.
pub async fn update_repair(
    State(state): State<AppState>,
    Path(repair_id): Path<Uuid>,
    Json(input): Json<UpdateRepairInput>,
) -> AppResult<Json<RepairLog>> {
    let service = RepairService::new(state.db);
    let repair = service.update(repair_id, input).await?;
    Ok(Json(repair))
}

/// Get the status history of a repair
pub async fn get_repair_movements(
    State(state): State<AppState>,
    Path(repair_id): Path<Uuid>,
) -> AppResult<Json<Vec<RepairMovement>>> {
    let service = RepairService::new(state.db);
    let movements = service.movements(repair_id).await?;
    Ok(Json(movements))
}
