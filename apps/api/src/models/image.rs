use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A standalone uploaded image. Write-once: there is no update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub image_path: String,
    pub upload_date: DateTime<Utc>,
    pub image_type: Option<String>,
    pub public_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub image_path: String,
    pub image_type: Option<String>,
    pub public_id: Option<String>,
}
