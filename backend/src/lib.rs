//! Asset Inventory Platform - Backend
//!
//! REST backend for tracking an organization's assets: products, vendors,
//! departments, transfers between departments and repair workflows.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use crate::config::Config;

use services::CodeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub codes: CodeGenerator,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, config: Config) -> Self {
        let codes = CodeGenerator::new(config.codes.max_attempts);
        Self {
            db,
            config: Arc::new(config),
            codes,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Asset Inventory Platform API v1.0"
}
