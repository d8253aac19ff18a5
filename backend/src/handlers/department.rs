//! HTTP handlers for department management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ListQuery;
use crate::services::department::{CreateDepartmentInput, Department, DepartmentService, UpdateDepartmentInput};
use crate::AppState;

/// List departments
pub async fn list_departments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Department>>> {
    let service = DepartmentService::new(state.db, state.codes);
    let departments = service.list(&query).await?;
    Ok(Json(departments))
}

/// Get a department by ID
pub async fn get_department(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> AppResult<Json<Department>> {
    let service = DepartmentService::new(state.db, state.codes);
    let department = service.get(department_id).await?;
    Ok(Json(department))
}

/// Create a department
pub async fn create_department(
    State(state): State<AppState>,
    Json(input): Json<CreateDepartmentInput>,
) -> AppResult<(StatusCode, Json<Department>)> {
    let service = DepartmentService::new(state.db, state.codes);
    let department = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update a department
pub async fn update_department(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
    Json(input): Json<UpdateDepartmentInput>,
) -> AppResult<Json<Department>> {
    let service = DepartmentService::new(state.db, state.codes);
    let department = service.update(department_id, input).await?;
    Ok(Json(department))
}

/// Deactivate a department
pub async fn delete_department(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = DepartmentService::new(state.db, state.codes);
    service.deactivate(department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
