use std::sync::Arc;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::store::StoreError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// A PostgreSQL pool that connects on first use.
///
/// Clones share one cell, so concurrent first requests make a single connect
/// attempt. A failed attempt leaves the cell empty and the next caller retries.
#[derive(Clone)]
pub struct LazyPool {
    database_url: Arc<str>,
    max_connections: u32,
    cell: Arc<OnceCell<PgPool>>,
}

impl LazyPool {
    pub fn new(database_url: &str, max_connections: u32) -> Self {
        Self {
            database_url: Arc::from(database_url),
            max_connections,
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the shared pool, connecting and migrating it on first call.
    pub async fn get(&self) -> Result<&PgPool, StoreError> {
        self.cell
            .get_or_try_init(|| create_pool(&self.database_url, self.max_connections))
            .await
    }
}

/// Creates a PostgreSQL connection pool and applies pending migrations.
async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            warn!("PostgreSQL connection failed: {e}");
            StoreError::Unavailable(e.to_string())
        })?;

    MIGRATOR.run(&pool).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
