//! Axum route handlers for the Templates API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;
use crate::templates::registry::TemplateSummary;
use crate::templates::TemplateKey;

#[derive(Debug, Serialize)]
pub struct TemplateCatalogResponse {
    pub default_template: TemplateKey,
    pub templates: Vec<TemplateSummary>,
}

/// GET /api/v1/templates
///
/// Every built-in template in registry order, plus the configured default.
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateCatalogResponse> {
    Json(TemplateCatalogResponse {
        default_template: state.registry.default_key().clone(),
        templates: state.registry.catalog(),
    })
}
