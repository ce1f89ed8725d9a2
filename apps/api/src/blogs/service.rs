use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::media::MediaCategory;
use crate::models::{Blog, BlogFields, BlogUpdate};
use crate::store::Store;
use crate::upload::{FilePolicy, FileUpload, UploadForm, UploadPipeline};
use crate::validation::require;

/// Multipart part that carries the cover image.
pub const COVER_IMAGE_FIELD: &str = "coverImage";

/// Validates the text fields and, if present, the cover file's type and size.
fn read_form(
    uploads: &UploadPipeline,
    mut form: UploadForm,
) -> Result<(BlogFields, Option<FileUpload>), AppError> {
    let fields = BlogFields {
        title: require(form.text("title"), "title")?,
        content: require(form.text("content"), "content")?,
    };
    let cover = form.take_file();
    if let Some(cover) = &cover {
        uploads.check(cover, FilePolicy::Image)?;
    }
    Ok((fields, cover))
}

pub async fn list_blogs(store: &dyn Store) -> Result<Vec<Blog>, AppError> {
    Ok(store.list_blogs().await?)
}

pub async fn get_blog(store: &dyn Store, id: Uuid) -> Result<Blog, AppError> {
    store
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Blog {id} not found")))
}

pub async fn create_blog(
    store: &dyn Store,
    uploads: &UploadPipeline,
    form: UploadForm,
) -> Result<Blog, AppError> {
    let (fields, cover) = read_form(uploads, form)?;

    let stored = match cover {
        Some(cover) => Some(uploads.upload(cover, MediaCategory::BlogCovers).await?),
        None => None,
    };

    match store
        .insert_blog(fields, stored.as_ref().map(|s| s.url.clone()))
        .await
    {
        Ok(blog) => {
            info!("Created blog {}", blog.id);
            Ok(blog)
        }
        Err(e) => {
            if let Some(stored) = &stored {
                uploads.discard(stored).await;
            }
            Err(e.into())
        }
    }
}

/// Overwrites title and content. The cover is replaced only when a new file
/// is supplied.
pub async fn update_blog(
    store: &dyn Store,
    uploads: &UploadPipeline,
    id: Uuid,
    form: UploadForm,
) -> Result<Blog, AppError> {
    let (fields, cover) = read_form(uploads, form)?;

    // Fail fast on a missing post before spending an upload on it.
    get_blog(store, id).await?;

    let stored = match cover {
        Some(cover) => Some(uploads.upload(cover, MediaCategory::BlogCovers).await?),
        None => None,
    };

    let update = BlogUpdate {
        fields,
        cover_image: stored.as_ref().map(|s| s.url.clone()),
    };
    let result = store.update_blog(id, update).await;

    match result {
        Ok(Some(blog)) => {
            info!("Updated blog {}", blog.id);
            Ok(blog)
        }
        Ok(None) => {
            if let Some(stored) = &stored {
                uploads.discard(stored).await;
            }
            Err(AppError::NotFound(format!("Blog {id} not found")))
        }
        Err(e) => {
            if let Some(stored) = &stored {
                uploads.discard(stored).await;
            }
            Err(e.into())
        }
    }
}

pub async fn delete_blog(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_blog(id).await? {
        return Err(AppError::NotFound(format!("Blog {id} not found")));
    }
    info!("Deleted blog {id}");
    Ok(())
}
