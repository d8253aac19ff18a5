//! HTTP handlers for category management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ListQuery;
use crate::services::category::{CreateCategoryInput, Category, CategoryService, UpdateCategoryInput};
use crate::AppState;

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db, state.codes);
    let categories = service.list(&query).await?;
    Ok(Json(categories))
}

/// Get a category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db, state.codes);
    let category = service.get(category_id).await?;
    Ok(Json(category))
}

/// Create a category; the slug is derived from the name
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let service = CategoryService::new(state.db, state.codes);
    let category = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db, state.codes);
    let category = service.update(category_id, input).await?;
    Ok(Json(category))
}

/// Deactivate a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CategoryService::new(state.db, state.codes);
    service.deactivate(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
