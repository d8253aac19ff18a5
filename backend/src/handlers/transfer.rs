//! HTTP handlers for transfer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::transfer::{CreateTransferInput, TransferLog, TransferService};
use crate::AppState;

/// Query parameters for listing transfers
#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    pub product_id: Option<Uuid>,
}

/// List transfers
pub async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<ListTransfersQuery>,
) -> AppResult<Json<Vec<TransferLog>>> {
    let service = TransferService::new(state.db);
    let transfers = service.list(query.product_id).await?;
    Ok(Json(transfers))
}

/// Get a transfer by ID
pub async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> AppResult<Json<TransferLog>> {
    let service = TransferService::new(state.db);
    let transfer = service.get(transfer_id).await?;
    Ok(Json(transfer))
}

/// Record a transfer, moving the product to the destination department
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(input): Json<CreateTransferInput>,
) -> AppResult<(StatusCode, Json<TransferLog>)> {
    let service = TransferService::new(state.db);
    let transfer = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}
