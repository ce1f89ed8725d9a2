use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::applications::service::{self, RESUME_FIELD};
use crate::errors::AppError;
use crate::models::{Application, ApplicationWithJob};
use crate::state::AppState;
use crate::upload::UploadForm;
use crate::validation::parse_id;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub application: Application,
}

/// POST /api/applications (multipart, file part "resume")
pub async fn handle_submit_application(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let form = UploadForm::read(multipart?, RESUME_FIELD).await?;
    let application =
        service::submit_application(state.store.as_ref(), &state.uploads, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Application submitted successfully",
            application,
        }),
    ))
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    Ok(Json(service::list_applications(state.store.as_ref()).await?))
}

/// DELETE /api/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Application")?;
    service::delete_application(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
