use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlogFields {
    pub title: String,
    pub content: String,
}

/// An overwrite of a blog's text. `cover_image: None` keeps the stored cover.
#[derive(Debug, Clone)]
pub struct BlogUpdate {
    pub fields: BlogFields,
    pub cover_image: Option<String>,
}
