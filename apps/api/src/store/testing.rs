//! A store whose writes all fail, for exercising post-upload failure paths.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationWithJob, Blog, BlogFields, BlogUpdate, Image, Job, JobFields,
    NewApplication, NewImage,
};
use crate::store::{
    ApplicationStore, BlogStore, ImageStore, JobStore, MemoryStore, Store, StoreError,
    StoreResult,
};

/// Reads and deletes go to the wrapped `MemoryStore`; inserts and updates
/// fail as if the database dropped the connection.
#[derive(Default)]
pub struct ReadOnlyStore(pub MemoryStore);

fn refused<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection reset".to_string()))
}

impl Store for ReadOnlyStore {
    fn backend(&self) -> &'static str {
        "read-only"
    }
}

#[async_trait]
impl JobStore for ReadOnlyStore {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        self.0.list_jobs().await
    }
    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        self.0.get_job(id).await
    }
    async fn insert_job(&self, _: JobFields) -> StoreResult<Job> {
        refused()
    }
    async fn update_job(&self, _: Uuid, _: JobFields) -> StoreResult<Option<Job>> {
        refused()
    }
    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        self.0.delete_job(id).await
    }
}

#[async_trait]
impl ApplicationStore for ReadOnlyStore {
    async fn list_applications(&self) -> StoreResult<Vec<ApplicationWithJob>> {
        self.0.list_applications().await
    }
    async fn insert_application(&self, _: NewApplication) -> StoreResult<Application> {
        refused()
    }
    async fn delete_application(&self, id: Uuid) -> StoreResult<bool> {
        self.0.delete_application(id).await
    }
}

#[async_trait]
impl BlogStore for ReadOnlyStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        self.0.list_blogs().await
    }
    async fn get_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        self.0.get_blog(id).await
    }
    async fn insert_blog(&self, _: BlogFields, _: Option<String>) -> StoreResult<Blog> {
        refused()
    }
    async fn update_blog(&self, _: Uuid, _: BlogUpdate) -> StoreResult<Option<Blog>> {
        refused()
    }
    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool> {
        self.0.delete_blog(id).await
    }
}

#[async_trait]
impl ImageStore for ReadOnlyStore {
    async fn insert_image(&self, _: NewImage) -> StoreResult<Image> {
        refused()
    }
    async fn latest_image(&self) -> StoreResult<Option<Image>> {
        self.0.latest_image().await
    }
}
