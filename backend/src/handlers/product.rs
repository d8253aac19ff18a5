//! HTTP handlers for product endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ProductFilter;
use crate::services::product::{CreateProductInput, Product, ProductService, UpdateProductInput};
use crate::AppState;

/// List products with optional status, category, department, vendor and
/// search filters
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db, state.codes);
    let products = service.list(&filter).await?;
    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db, state.codes);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db, state.codes);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db, state.codes);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Deactivate a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.db, state.codes);
    service.deactivate(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
