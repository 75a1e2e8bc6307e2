//! Axum route handlers for the Resumes API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Resume;
use crate::resumes::store::{delete_resume, list_resumes, load_resume, save_resume, ResumeSummary};
use crate::state::AppState;

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(list_resumes(&state.db).await?))
}

/// POST /api/v1/resumes
///
/// Creates the resume when it carries no id, otherwise replaces it in full.
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(resume): Json<Resume>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let status = if resume.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let saved = save_resume(&state.db, &resume).await?;
    Ok((status, Json(saved)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    load_resume(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if delete_resume(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}
