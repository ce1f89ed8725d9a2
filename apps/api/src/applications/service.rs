use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::media::MediaCategory;
use crate::models::{ApplicantFields, Application, ApplicationWithJob, NewApplication};
use crate::store::Store;
use crate::upload::{FilePolicy, UploadForm, UploadPipeline};
use crate::validation::{optional, require};

/// Multipart part that carries the resume.
pub const RESUME_FIELD: &str = "resume";

fn applicant_fields(form: &UploadForm) -> Result<ApplicantFields, AppError> {
    let job_id = require(form.text("jobId"), "jobId")?;
    let job_id = Uuid::parse_str(&job_id)
        .map_err(|_| AppError::Validation(format!("jobId '{job_id}' is not a valid id")))?;
    Ok(ApplicantFields {
        job_id,
        name: require(form.text("name"), "name")?,
        email: require(form.text("email"), "email")?,
        phone: require(form.text("phone"), "phone")?,
        portfolio: optional(form.text("portfolio")),
    })
}

pub async fn submit_application(
    store: &dyn Store,
    uploads: &UploadPipeline,
    mut form: UploadForm,
) -> Result<Application, AppError> {
    let resume = form
        .take_file()
        .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;
    uploads.check(&resume, FilePolicy::Document)?;
    let applicant = applicant_fields(&form)?;

    let stored = uploads.upload(resume, MediaCategory::Resumes).await?;

    let new_application = NewApplication {
        applicant,
        resume_url: stored.url.clone(),
    };
    match store.insert_application(new_application).await {
        Ok(application) => {
            info!(
                "Application {} submitted for job {}",
                application.id, application.job_id
            );
            Ok(application)
        }
        Err(e) => {
            uploads.discard(&stored).await;
            Err(e.into())
        }
    }
}

pub async fn list_applications(store: &dyn Store) -> Result<Vec<ApplicationWithJob>, AppError> {
    Ok(store.list_applications().await?)
}

/// Removes the record only; the stored resume stays on the media host.
pub async fn delete_application(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_application(id).await? {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    info!("Deleted application {id}");
    Ok(())
}
