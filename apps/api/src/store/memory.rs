use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Application, ApplicationWithJob, Blog, BlogFields, BlogUpdate, Image, Job, JobFields,
    NewApplication, NewImage,
};
use crate::store::{ApplicationStore, BlogStore, ImageStore, JobStore, Store, StoreResult};

/// Process-local record store. Each collection keeps insertion order.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<Vec<Job>>,
    applications: RwLock<Vec<Application>>,
    blogs: RwLock<Vec<Blog>>,
    images: RwLock<Vec<Image>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Removes the first element matching `id_of == id`; reports whether one was found.
fn remove_by_id<T>(items: &mut Vec<T>, id: Uuid, id_of: impl Fn(&T) -> Uuid) -> bool {
    match items.iter().position(|item| id_of(item) == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self.jobs.read().await.clone())
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn insert_job(&self, fields: JobFields) -> StoreResult<Job> {
        let job = Job {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            location: fields.location,
        };
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn update_job(&self, id: Uuid, fields: JobFields) -> StoreResult<Option<Job>> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.title = fields.title;
            job.description = fields.description;
            job.location = fields.location;
            job.clone()
        }))
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<bool> {
        Ok(remove_by_id(&mut *self.jobs.write().await, id, |j| j.id))
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list_applications(&self) -> StoreResult<Vec<ApplicationWithJob>> {
        let applications = self.applications.read().await;
        let jobs = self.jobs.read().await;
        Ok(applications
            .iter()
            .map(|application| ApplicationWithJob {
                job: jobs.iter().find(|j| j.id == application.job_id).cloned(),
                application: application.clone(),
            })
            .collect())
    }

    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application> {
        let NewApplication {
            applicant,
            resume_url,
        } = application;
        let application = Application {
            id: Uuid::new_v4(),
            job_id: applicant.job_id,
            name: applicant.name,
            email: applicant.email,
            phone: applicant.phone,
            portfolio: applicant.portfolio,
            resume_url,
            created_at: Utc::now(),
        };
        self.applications.write().await.push(application.clone());
        Ok(application)
    }

    async fn delete_application(&self, id: Uuid) -> StoreResult<bool> {
        Ok(remove_by_id(
            &mut *self.applications.write().await,
            id,
            |a| a.id,
        ))
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        // Reverse first so equal timestamps still come out newest-insert first.
        let mut blogs: Vec<Blog> = self.blogs.read().await.iter().rev().cloned().collect();
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(blogs)
    }

    async fn get_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        Ok(self.blogs.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_blog(
        &self,
        fields: BlogFields,
        cover_image: Option<String>,
    ) -> StoreResult<Blog> {
        let now = Utc::now();
        let blog = Blog {
            id: Uuid::new_v4(),
            title: fields.title,
            content: fields.content,
            cover_image,
            created_at: now,
            updated_at: now,
        };
        self.blogs.write().await.push(blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, id: Uuid, update: BlogUpdate) -> StoreResult<Option<Blog>> {
        let mut blogs = self.blogs.write().await;
        Ok(blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            blog.title = update.fields.title;
            blog.content = update.fields.content;
            if let Some(cover_image) = update.cover_image {
                blog.cover_image = Some(cover_image);
            }
            blog.updated_at = Utc::now();
            blog.clone()
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool> {
        Ok(remove_by_id(&mut *self.blogs.write().await, id, |b| b.id))
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn insert_image(&self, image: NewImage) -> StoreResult<Image> {
        let image = Image {
            id: Uuid::new_v4(),
            image_path: image.image_path,
            upload_date: Utc::now(),
            image_type: image.image_type,
            public_id: image.public_id,
        };
        self.images.write().await.push(image.clone());
        Ok(image)
    }

    async fn latest_image(&self) -> StoreResult<Option<Image>> {
        // max_by_key returns the last of several equal maxima, i.e. the newest insert.
        Ok(self
            .images
            .read()
            .await
            .iter()
            .max_by_key(|image| image.upload_date)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicantFields;

    fn job_fields(title: &str) -> JobFields {
        JobFields {
            title: title.to_string(),
            description: "Build things".to_string(),
            location: "Remote".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_missing_job_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .update_job(Uuid::new_v4(), job_fields("Engineer"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_job_leaves_collection_alone() {
        let store = MemoryStore::new();
        store.insert_job(job_fields("Engineer")).await.unwrap();
        assert!(!store.delete_job(Uuid::new_v4()).await.unwrap());
        assert_eq!(store.list_jobs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_applications_embed_existing_job_only() {
        let store = MemoryStore::new();
        let job = store.insert_job(job_fields("Engineer")).await.unwrap();
        for job_id in [job.id, Uuid::new_v4()] {
            store
                .insert_application(NewApplication {
                    applicant: ApplicantFields {
                        job_id,
                        name: "Ada".to_string(),
                        email: "ada@example.com".to_string(),
                        phone: "555-0100".to_string(),
                        portfolio: None,
                    },
                    resume_url: "memory://resumes/cv.pdf".to_string(),
                })
                .await
                .unwrap();
        }

        let listed = store.list_applications().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].job.as_ref(), Some(&job));
        assert!(listed[1].job.is_none());
    }

    #[tokio::test]
    async fn test_blog_update_without_cover_keeps_existing() {
        let store = MemoryStore::new();
        let fields = BlogFields {
            title: "Hello".to_string(),
            content: "World".to_string(),
        };
        let blog = store
            .insert_blog(fields.clone(), Some("memory://blogs/a.png".to_string()))
            .await
            .unwrap();

        let updated = store
            .update_blog(
                blog.id,
                BlogUpdate {
                    fields,
                    cover_image: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cover_image.as_deref(), Some("memory://blogs/a.png"));
        assert_eq!(updated.created_at, blog.created_at);
    }

    #[tokio::test]
    async fn test_latest_image_prefers_newest_insert() {
        let store = MemoryStore::new();
        assert!(store.latest_image().await.unwrap().is_none());
        for n in 0..3 {
            store
                .insert_image(NewImage {
                    image_path: format!("memory://images/{n}.png"),
                    image_type: Some("image/png".to_string()),
                    public_id: None,
                })
                .await
                .unwrap();
        }
        let latest = store.latest_image().await.unwrap().unwrap();
        assert_eq!(latest.image_path, "memory://images/2.png");
    }
}
