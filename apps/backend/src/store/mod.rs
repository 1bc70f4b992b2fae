//! Persistence for questions, mastery state, review history and settings.
//!
//! The scheduler itself never touches storage; handlers and services go
//! through [`MasteryStore`] so the same API runs on PostgreSQL, SQLite or
//! plain memory.

pub mod memory;
pub mod postgres;
mod schema;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::models::{MasteryRecord, NewQuestion, Question, ReviewLog, StudySettings};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait MasteryStore: Send + Sync {
    /// Short adapter name for logs.
    fn backend(&self) -> &'static str;

    // === Mastery ===

    async fn get_mastery(&self, user_id: Uuid, question_id: i64) -> Result<Option<MasteryRecord>>;

    /// Insert or replace the record for its (user, question) pair.
    async fn upsert_mastery(&self, record: &MasteryRecord) -> Result<()>;

    /// Every record for a user, ordered by question id.
    async fn list_mastery_for_user(&self, user_id: Uuid) -> Result<Vec<MasteryRecord>>;

    // === Review history ===

    async fn insert_review(&self, review: &ReviewLog) -> Result<()>;

    async fn count_reviews_for_user(&self, user_id: Uuid) -> Result<usize>;

    // === Questions ===

    async fn create_question(&self, question: &NewQuestion) -> Result<Question>;

    async fn get_question(&self, question_id: i64) -> Result<Option<Question>>;

    /// Question ids in ascending order, optionally limited to one subject.
    async fn list_question_ids(&self, subject: Option<&str>) -> Result<Vec<i64>>;

    // === Study settings ===

    /// Stored settings, or defaults for a user who never saved any.
    async fn get_study_settings(&self, user_id: Uuid) -> Result<StudySettings>;

    async fn upsert_study_settings(&self, user_id: Uuid, settings: &StudySettings) -> Result<()>;
}

/// Open the store selected by `config`, running migrations where needed.
pub async fn open(config: &Config) -> anyhow::Result<Arc<dyn MasteryStore>> {
    let store: Arc<dyn MasteryStore> = match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

            tracing::info!("Connecting to database...");
            let store = PgStore::connect(url).await?;

            tracing::info!("Running migrations...");
            store.run_migrations().await?;
            Arc::new(store)
        }
        StoreBackend::Sqlite => {
            tracing::info!(path = %config.sqlite_path.display(), "Opening SQLite store...");
            Arc::new(SqliteStore::open(&config.sqlite_path)?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}
