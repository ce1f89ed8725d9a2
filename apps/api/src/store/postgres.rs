use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::LazyPool;
use crate::models::{
    Application, ApplicationWithJob, Blog, BlogFields, BlogUpdate, Image, Job, JobFields,
    NewApplication, NewImage,
};
use crate::store::{ApplicationStore, BlogStore, ImageStore, JobStore, Store, StoreResult};

const BLOG_COLUMNS: &str = "id, title, content, cover_image, created_at, updated_at";
const IMAGE_COLUMNS: &str = "id, image_path, upload_date, image_type, public_id";

/// Newest first; `seq` orders rows created in the same instant by insert.
const BLOG_ORDER: &str = "created_at DESC, seq DESC";
const IMAGE_ORDER: &str = "upload_date DESC, seq DESC";

#[derive(Clone)]
pub struct PgStore {
    pool: LazyPool,
}

impl PgStore {
    pub fn new(pool: LazyPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Job>("SELECT id, title, description, location FROM jobs")
            .fetch_all(pool)
            .await?)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Job>(
            "SELECT id, title, description, location FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?)
    }

    async fn insert_job(&self, fields: JobFields) -> StoreResult<Job> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, title, description, location)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, location
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .fetch_one(pool)
        .await?)
    }

    async fn update_job(&self, id: Uuid, fields: JobFields) -> StoreResult<Option<Job>> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET title = $2, description = $3, location = $4
            WHERE id = $1
            RETURNING id, title, description, location
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .fetch_optional(pool)
        .await?)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        let pool = self.pool.get().await?;
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// One row of the applications ⟕ jobs join. Job columns are all NULL when the
/// referenced posting is gone.
#[derive(FromRow)]
struct ApplicationJobRow {
    id: Uuid,
    job_id: Uuid,
    name: String,
    email: String,
    phone: String,
    portfolio: Option<String>,
    resume_url: String,
    created_at: DateTime<Utc>,
    job_title: Option<String>,
    job_description: Option<String>,
    job_location: Option<String>,
}

impl From<ApplicationJobRow> for ApplicationWithJob {
    fn from(row: ApplicationJobRow) -> Self {
        let job = match (row.job_title, row.job_description, row.job_location) {
            (Some(title), Some(description), Some(location)) => Some(Job {
                id: row.job_id,
                title,
                description,
                location,
            }),
            _ => None,
        };
        ApplicationWithJob {
            application: Application {
                id: row.id,
                job_id: row.job_id,
                name: row.name,
                email: row.email,
                phone: row.phone,
                portfolio: row.portfolio,
                resume_url: row.resume_url,
                created_at: row.created_at,
            },
            job,
        }
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn list_applications(&self) -> StoreResult<Vec<ApplicationWithJob>> {
        let pool = self.pool.get().await?;
        let rows = sqlx::query_as::<_, ApplicationJobRow>(
            r#"
            SELECT a.id, a.job_id, a.name, a.email, a.phone, a.portfolio,
                   a.resume_url, a.created_at,
                   j.title AS job_title,
                   j.description AS job_description,
                   j.location AS job_location
            FROM applications a
            LEFT JOIN jobs j ON j.id = a.job_id
            ORDER BY a.created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(ApplicationWithJob::from).collect())
    }

    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application> {
        let pool = self.pool.get().await?;
        let NewApplication {
            applicant,
            resume_url,
        } = application;
        Ok(sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (id, job_id, name, email, phone, portfolio, resume_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, job_id, name, email, phone, portfolio, resume_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(applicant.job_id)
        .bind(&applicant.name)
        .bind(&applicant.email)
        .bind(&applicant.phone)
        .bind(&applicant.portfolio)
        .bind(&resume_url)
        .fetch_one(pool)
        .await?)
    }

    async fn delete_application(&self, id: Uuid) -> StoreResult<bool> {
        let pool = self.pool.get().await?;
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY {BLOG_ORDER}"
        ))
        .fetch_all(pool)
        .await?)
    }

    async fn get_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let pool = self.pool.get().await?;
        Ok(
            sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await?,
        )
    }

    async fn insert_blog(
        &self,
        fields: BlogFields,
        cover_image: Option<String>,
    ) -> StoreResult<Blog> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (id, title, content, cover_image)
            VALUES ($1, $2, $3, $4)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&cover_image)
        .fetch_one(pool)
        .await?)
    }

    async fn update_blog(&self, id: Uuid, update: BlogUpdate) -> StoreResult<Option<Blog>> {
        let pool = self.pool.get().await?;
        // COALESCE keeps the stored cover when no new one was uploaded.
        Ok(sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs
            SET title = $2,
                content = $3,
                cover_image = COALESCE($4, cover_image),
                updated_at = now()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.fields.title)
        .bind(&update.fields.content)
        .bind(&update.cover_image)
        .fetch_optional(pool)
        .await?)
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool> {
        let pool = self.pool.get().await?;
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ImageStore for PgStore {
    async fn insert_image(&self, image: NewImage) -> StoreResult<Image> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Image>(&format!(
            r#"
            INSERT INTO images (id, image_path, image_type, public_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {IMAGE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&image.image_path)
        .bind(&image.image_type)
        .bind(&image.public_id)
        .fetch_one(pool)
        .await?)
    }

    async fn latest_image(&self) -> StoreResult<Option<Image>> {
        let pool = self.pool.get().await?;
        Ok(sqlx::query_as::<_, Image>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images ORDER BY {IMAGE_ORDER} LIMIT 1"
        ))
        .fetch_optional(pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATIONS: [&str; 2] = [
        include_str!("../../migrations/20240101000000_init.sql"),
        include_str!("../../migrations/20240102000000_blogs_seq.sql"),
    ];

    #[test]
    fn test_blog_listing_breaks_timestamp_ties_by_insert_order() {
        assert_eq!(BLOG_ORDER, "created_at DESC, seq DESC");
        assert!(MIGRATIONS
            .iter()
            .any(|sql| sql.contains("ALTER TABLE blogs ADD COLUMN IF NOT EXISTS seq BIGSERIAL")));
    }

    #[test]
    fn test_latest_image_breaks_timestamp_ties_by_insert_order() {
        assert_eq!(IMAGE_ORDER, "upload_date DESC, seq DESC");
        assert!(MIGRATIONS[0].contains("seq         BIGSERIAL NOT NULL"));
    }
}
