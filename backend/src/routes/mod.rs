//! Route definitions for the Asset Inventory Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Master data
        .nest("/vendors", vendor_routes())
        .nest("/departments", department_routes())
        .nest("/statuses", status_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        // Workflows
        .nest("/transfers", transfer_routes())
        .nest("/repair-statuses", repair_status_routes())
        .nest("/repairs", repair_routes())
        // Reporting
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/export/products", get(handlers::export_products))
}

fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vendors).post(handlers::create_vendor))
        .route(
            "/:vendor_id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
}

fn department_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/:department_id",
            get(handlers::get_department)
                .put(handlers::update_department)
                .delete(handlers::delete_department),
        )
}

fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_statuses).post(handlers::create_status))
        .route(
            "/:status_id",
            get(handlers::get_status)
                .put(handlers::update_status)
                .delete(handlers::delete_status),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Transfers are immutable once recorded
fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transfers).post(handlers::create_transfer))
        .route("/:transfer_id", get(handlers::get_transfer))
}

fn repair_status_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_repair_statuses).post(handlers::create_repair_status),
        )
        .route(
            "/:repair_status_id",
            get(handlers::get_repair_status)
                .put(handlers::update_repair_status)
                .delete(handlers::delete_repair_status),
        )
}

fn repair_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_repairs).post(handlers::create_repair))
        .route(
            "/:repair_id",
            get(handlers::get_repair).put(handlers::update_repair),
        )
        .route("/:repair_id/movements", get(handlers::get_repair_movements))
}
