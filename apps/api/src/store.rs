//! Document store for parsed résumés.
//!
//! Handlers only see `ResumeStore`; production uses PostgreSQL, tests use
//! an in-memory map.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::StoredResume;
use crate::resume::normalize::NormalizedRecord;

/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, record: &NormalizedRecord) -> Result<Uuid, sqlx::Error>;
    /// Newest first.
    async fn find_all(&self) -> Result<Vec<StoredResume>, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredResume>, sqlx::Error>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, record: &NormalizedRecord) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO resumes (id, data) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(record))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<StoredResume>, sqlx::Error> {
        sqlx::query_as("SELECT id, data, created_at FROM resumes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredResume>, sqlx::Error> {
        sqlx::query_as("SELECT id, data, created_at FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
