//! Record store: the four collections (jobs, applications, blogs, images).
//!
//! Handlers and services only see `Arc<dyn Store>`; the backend is picked at
//! startup from `STORE_BACKEND`:
//! - `PgStore`: Postgres through a lazily connected pool.
//! - `MemoryStore`: process-local maps, for development and tests.
//!
//! References between collections are not enforced: an application may point
//! at a job that no longer exists.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationWithJob, Blog, BlogFields, BlogUpdate, Image, Job, JobFields,
    NewApplication, NewImage,
};

pub mod memory;
pub mod postgres;
#[cfg(test)]
pub mod testing;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>>;
    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>>;
    async fn insert_job(&self, fields: JobFields) -> StoreResult<Job>;
    /// Overwrites all fields. `None` when the job does not exist.
    async fn update_job(&self, id: Uuid, fields: JobFields) -> StoreResult<Option<Job>>;
    /// `false` when the job does not exist.
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn list_applications(&self) -> StoreResult<Vec<ApplicationWithJob>>;
    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application>;
    async fn delete_application(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Newest first.
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>>;
    async fn get_blog(&self, id: Uuid) -> StoreResult<Option<Blog>>;
    async fn insert_blog(&self, fields: BlogFields, cover_image: Option<String>)
        -> StoreResult<Blog>;
    async fn update_blog(&self, id: Uuid, update: BlogUpdate) -> StoreResult<Option<Blog>>;
    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn insert_image(&self, image: NewImage) -> StoreResult<Image>;
    /// Most recent `upload_date`; ties go to the later insert.
    async fn latest_image(&self) -> StoreResult<Option<Image>>;
}

/// The full record store carried in `AppState`.
pub trait Store: JobStore + ApplicationStore + BlogStore + ImageStore {
    fn backend(&self) -> &'static str;
}
