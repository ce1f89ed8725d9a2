use tracing::info;

use crate::errors::AppError;
use crate::media::MediaCategory;
use crate::models::{Image, NewImage};
use crate::store::Store;
use crate::upload::{FilePolicy, UploadForm, UploadPipeline};

/// Multipart part that carries the image.
pub const IMAGE_FIELD: &str = "image";

pub async fn upload_image(
    store: &dyn Store,
    uploads: &UploadPipeline,
    mut form: UploadForm,
) -> Result<Image, AppError> {
    let file = form
        .take_file()
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    uploads.check(&file, FilePolicy::Image)?;

    let image_type = file.content_type.clone();
    let stored = uploads.upload(file, MediaCategory::Images).await?;

    let new_image = NewImage {
        image_path: stored.url.clone(),
        image_type,
        public_id: Some(stored.public_id.clone()),
    };
    match store.insert_image(new_image).await {
        Ok(image) => {
            info!("Recorded image {} at {}", image.id, image.image_path);
            Ok(image)
        }
        Err(e) => {
            uploads.discard(&stored).await;
            Err(e.into())
        }
    }
}

pub async fn latest_image(store: &dyn Store) -> Result<Image, AppError> {
    store
        .latest_image()
        .await?
        .ok_or_else(|| AppError::NotFound("No images found".to_string()))
}
