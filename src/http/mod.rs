//! @ai:module:intent HTTP surface of the report service
//! @ai:module:layer interface
//! @ai:module:public_api build_router, AppState

pub mod error;
pub mod handlers;

use crate::service::ReportService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub type AppState = Arc<ReportService>;

/// @ai:intent Assemble all routes over a shared service
/// @ai:effects pure
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/projects", get(handlers::list_projects))
        .route("/projects/:project_id", get(handlers::get_project))
        .route("/reports/generate", post(handlers::generate_report))
        .route("/reports/generate-template", post(handlers::generate_template_report))
        .route("/reports/types", get(handlers::report_types))
        .route("/reports/languages", get(handlers::languages))
        .route("/reports/download", get(handlers::download_report))
        .with_state(state)
}
