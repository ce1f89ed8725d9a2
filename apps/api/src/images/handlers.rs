use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::images::service::{self, IMAGE_FIELD};
use crate::models::Image;
use crate::state::AppState;
use crate::upload::UploadForm;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub image_path: String,
    pub image: Image,
}

/// POST /api/images/upload (multipart, file part "image")
pub async fn handle_upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ImageResponse>), AppError> {
    let form = UploadForm::read(multipart?, IMAGE_FIELD).await?;
    let image = service::upload_image(state.store.as_ref(), &state.uploads, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImageResponse {
            success: true,
            message: Some("Image uploaded successfully!"),
            image_path: image.image_path.clone(),
            image,
        }),
    ))
}

/// GET /api/images/latest
pub async fn handle_latest_image(
    State(state): State<AppState>,
) -> Result<Json<ImageResponse>, AppError> {
    let image = service::latest_image(state.store.as_ref()).await?;
    Ok(Json(ImageResponse {
        success: true,
        message: None,
        image_path: image.image_path.clone(),
        image,
    }))
}
