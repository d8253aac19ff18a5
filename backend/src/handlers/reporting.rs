//! Reporting handlers for the dashboard and data export

use axum::{extract::State, http::header, response::IntoResponse, Json};

use crate::error::AppResult;
use crate::services::reporting::{Dashboard, ReportingService};
use crate::AppState;

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<Dashboard>> {
    let service = ReportingService::new(state.db);
    let dashboard = service.get_dashboard().await?;
    Ok(Json(dashboard))
}

/// Export active products as CSV
pub async fn export_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let rows = service.product_export_rows().await?;
    let csv = ReportingService::export_to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"products.csv\"",
            ),
        ],
        csv,
    ))
}
