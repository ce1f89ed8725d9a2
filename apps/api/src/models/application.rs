use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub portfolio: Option<String>,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
}

/// An application as listed for admins: the referenced job is expanded in place.
/// `job` is `None` when the posting has since been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<Job>,
}

/// Applicant fields, checked for presence before any upload is attempted.
#[derive(Debug, Clone)]
pub struct ApplicantFields {
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub portfolio: Option<String>,
}

/// Everything needed to persist an application once the resume is stored.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub applicant: ApplicantFields,
    pub resume_url: String,
}
