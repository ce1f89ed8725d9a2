use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
}

/// Validated field set for creating or overwriting a job.
#[derive(Debug, Clone)]
pub struct JobFields {
    pub title: String,
    pub description: String,
    pub location: String,
}
