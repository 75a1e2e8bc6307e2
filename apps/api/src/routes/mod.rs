pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/templates", get(templates::handle_list_templates))
        // Exports
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .route("/api/v1/preview/pdf", post(export::handle_preview_pdf))
        .route("/api/v1/export/rtf", post(export::handle_export_rtf))
        .route("/api/v1/export/bulk", post(export::handle_export_bulk))
        .route(
            "/api/v1/export/branding-pack",
            post(export::handle_branding_pack),
        )
        .route(
            "/api/v1/export/portfolio",
            post(export::handle_export_portfolio),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_save_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .with_state(state)
}
