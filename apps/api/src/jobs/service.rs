use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Job, JobFields};
use crate::store::Store;
use crate::validation::require;

/// Request body for create and update. Every field is required; they are
/// optional here so a missing one becomes a 400 with the field's name.
#[derive(Debug, Default, Deserialize)]
pub struct JobInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl JobInput {
    fn validate(self) -> Result<JobFields, AppError> {
        Ok(JobFields {
            title: require(self.title, "title")?,
            description: require(self.description, "description")?,
            location: require(self.location, "location")?,
        })
    }
}

pub async fn list_jobs(store: &dyn Store) -> Result<Vec<Job>, AppError> {
    Ok(store.list_jobs().await?)
}

pub async fn get_job(store: &dyn Store, id: Uuid) -> Result<Job, AppError> {
    store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn create_job(store: &dyn Store, input: JobInput) -> Result<Job, AppError> {
    let fields = input.validate()?;
    let job = store.insert_job(fields).await?;
    info!("Created job {}", job.id);
    Ok(job)
}

pub async fn update_job(store: &dyn Store, id: Uuid, input: JobInput) -> Result<Job, AppError> {
    let fields = input.validate()?;
    store
        .update_job(id, fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn delete_job(store: &dyn Store, id: Uuid) -> Result<(), AppError> {
    if !store.delete_job(id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("Deleted job {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input(title: &str, description: &str, location: &str) -> JobInput {
        JobInput {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            location: Some(location.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_includes_new_job() {
        let store = MemoryStore::new();
        let job = create_job(&store, input("Engineer", "Build things", "Remote"))
            .await
            .unwrap();

        assert_eq!(job.title, "Engineer");
        assert_eq!(job.description, "Build things");
        assert_eq!(job.location, "Remote");

        let jobs = list_jobs(&store).await.unwrap();
        assert_eq!(jobs, vec![job]);
    }

    #[tokio::test]
    async fn test_each_create_assigns_fresh_id() {
        let store = MemoryStore::new();
        let a = create_job(&store, input("A", "a", "x")).await.unwrap();
        let b = create_job(&store, input("A", "a", "x")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_field() {
        let store = MemoryStore::new();
        let err = create_job(
            &store,
            JobInput {
                title: Some("Engineer".to_string()),
                description: Some("Build things".to_string()),
                location: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("location")));
        assert!(list_jobs(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields_and_keeps_id() {
        let store = MemoryStore::new();
        let job = create_job(&store, input("Engineer", "Build things", "Remote"))
            .await
            .unwrap();

        let updated = update_job(&store, job.id, input("Senior Engineer", "Lead", "Berlin"))
            .await
            .unwrap();
        assert_eq!(updated.id, job.id);
        assert_eq!(updated.title, "Senior Engineer");
        assert_eq!(updated.location, "Berlin");
        assert_eq!(get_job(&store, job.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_job_is_not_found() {
        let store = MemoryStore::new();
        let err = update_job(&store, Uuid::new_v4(), input("a", "b", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_job_is_not_found_and_changes_nothing() {
        let store = MemoryStore::new();
        create_job(&store, input("Engineer", "Build things", "Remote"))
            .await
            .unwrap();

        let err = delete_job(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(list_jobs(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_job() {
        let store = MemoryStore::new();
        let job = create_job(&store, input("Engineer", "Build things", "Remote"))
            .await
            .unwrap();
        delete_job(&store, job.id).await.unwrap();
        assert!(list_jobs(&store).await.unwrap().is_empty());
        assert!(matches!(
            delete_job(&store, job.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
