//! HTTP handlers for vendor management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ListQuery;
use crate::services::vendor::{CreateVendorInput, Vendor, VendorService, UpdateVendorInput};
use crate::AppState;

/// List vendors
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Vendor>>> {
    let service = VendorService::new(state.db, state.codes);
    let vendors = service.list(&query).await?;
    Ok(Json(vendors))
}

/// Get a vendor by ID
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.db, state.codes);
    let vendor = service.get(vendor_id).await?;
    Ok(Json(vendor))
}

/// Create a vendor with a fresh `VND-` code
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateVendorInput>,
) -> AppResult<(StatusCode, Json<Vendor>)> {
    let service = VendorService::new(state.db, state.codes);
    let vendor = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

/// Update a vendor
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<UpdateVendorInput>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.db, state.codes);
    let vendor = service.update(vendor_id, input).await?;
    Ok(Json(vendor))
}

/// Deactivate a vendor
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = VendorService::new(state.db, state.codes);
    service.deactivate(vendor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
