//! Axum route handlers for the Export API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::branding::{build_branding_pack, portfolio_html, BrandingContent};
use crate::export::bulk::render_bulk;
use crate::export::rtf::render_rtf;
use crate::export::{export_pdf, ExportError};
use crate::models::Resume;
use crate::state::AppState;
use crate::templates::RenderRequest;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume: Resume,
    #[serde(default)]
    pub options: RenderRequest,
}

#[derive(Debug, Deserialize)]
pub struct BulkExportRequest {
    pub resume: Resume,
    #[serde(default)]
    pub options: RenderRequest,
    #[serde(default)]
    pub template_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandingPackRequest {
    pub resume: Resume,
    #[serde(flatten)]
    pub content: BrandingContent,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub resume: Resume,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn file_response(content_type: &'static str, disposition: &str, filename: &str, body: Vec<u8>) -> Response {
    let disposition = format!("{disposition}; filename=\"{}\"", filename.replace('"', ""));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Runs a CPU-bound export off the async runtime.
async fn blocking<F>(job: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, ExportError> + Send + 'static,
{
    let bytes = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))??;
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn pdf_bytes(state: &AppState, request: ExportRequest) -> Result<(String, Vec<u8>), AppError> {
    let registry = state.registry.clone();
    let stem = request.resume.file_stem();
    let bytes = blocking(move || export_pdf(&registry, &request.resume, &request.options)).await?;
    Ok((stem, bytes))
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let (stem, bytes) = pdf_bytes(&state, request).await?;
    Ok(file_response("application/pdf", "attachment", &format!("{stem}.pdf"), bytes))
}

/// POST /api/v1/preview/pdf
///
/// Same document as the export, served inline for an embedded viewer.
pub async fn handle_preview_pdf(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let (stem, bytes) = pdf_bytes(&state, request).await?;
    Ok(file_response("application/pdf", "inline", &format!("{stem}.pdf"), bytes))
}

/// POST /api/v1/export/rtf
pub async fn handle_export_rtf(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    let stem = request.resume.file_stem();
    let bytes = blocking(move || Ok(render_rtf(&request.resume))).await?;
    info!(name = %stem, "RTF exported");
    Ok(file_response("application/rtf", "attachment", &format!("{stem}.rtf"), bytes))
}

/// POST /api/v1/export/bulk
///
/// Renders the resume once per named template and returns a ZIP.
pub async fn handle_export_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkExportRequest>,
) -> Result<Response, AppError> {
    let registry = state.registry.clone();
    let limit = state.config.bulk_template_limit;
    let stem = request.resume.file_stem();
    let bytes = blocking(move || {
        render_bulk(
            &registry,
            &request.resume,
            &request.template_names,
            &request.options,
            limit,
        )
    })
    .await?;
    Ok(file_response(
        "application/zip",
        "attachment",
        &format!("{stem}_bulk_templates.zip"),
        bytes,
    ))
}

/// POST /api/v1/export/branding-pack
pub async fn handle_branding_pack(Json(request): Json<BrandingPackRequest>) -> Result<Response, AppError> {
    let stem = request.resume.file_stem();
    let bytes = blocking(move || build_branding_pack(&request.resume, &request.content)).await?;
    Ok(file_response(
        "application/zip",
        "attachment",
        &format!("{stem}_branding_pack.zip"),
        bytes,
    ))
}

/// POST /api/v1/export/portfolio
pub async fn handle_export_portfolio(Json(request): Json<PortfolioRequest>) -> Result<Response, AppError> {
    let stem = request.resume.file_stem();
    let html = portfolio_html(&request.resume);
    info!(name = %stem, "portfolio exported");
    Ok(file_response(
        "text/html; charset=utf-8",
        "attachment",
        &format!("{stem}_portfolio.html"),
        html.into_bytes(),
    ))
}
