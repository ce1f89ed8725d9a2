use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::blogs::service::{self, COVER_IMAGE_FIELD};
use crate::errors::AppError;
use crate::models::Blog;
use crate::state::AppState;
use crate::upload::UploadForm;
use crate::validation::parse_id;

/// GET /api/blogs
pub async fn handle_list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(service::list_blogs(state.store.as_ref()).await?))
}

/// GET /api/blogs/:id
pub async fn handle_get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Blog>, AppError> {
    let id = parse_id(&id, "Blog")?;
    Ok(Json(service::get_blog(state.store.as_ref(), id).await?))
}

/// POST /api/blogs (multipart, optional file part "coverImage")
pub async fn handle_create_blog(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    let form = UploadForm::read(multipart?, COVER_IMAGE_FIELD).await?;
    let blog = service::create_blog(state.store.as_ref(), &state.uploads, form).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/:id (multipart, optional file part "coverImage")
pub async fn handle_update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Blog>, AppError> {
    let id = parse_id(&id, "Blog")?;
    let form = UploadForm::read(multipart?, COVER_IMAGE_FIELD).await?;
    Ok(Json(
        service::update_blog(state.store.as_ref(), &state.uploads, id, form).await?,
    ))
}

/// DELETE /api/blogs/:id
pub async fn handle_delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "Blog")?;
    service::delete_blog(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
