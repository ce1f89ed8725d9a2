use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::jobs::service::{self, JobInput};
use crate::models::Job;
use crate::state::AppState;
use crate::validation::parse_id;

/// GET /api/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(service::list_jobs(state.store.as_ref()).await?))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<JobInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let Json(input) = payload?;
    let job = service::create_job(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, "Job")?;
    Ok(Json(service::get_job(state.store.as_ref(), id).await?))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobInput>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, "Job")?;
    let Json(input) = payload?;
    Ok(Json(service::update_job(state.store.as_ref(), id, input).await?))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Job")?;
    service::delete_job(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
