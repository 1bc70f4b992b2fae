//! PostgreSQL store

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::MasteryStore;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MasteryStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn get_mastery(&self, user_id: Uuid, question_id: i64) -> Result<Option<MasteryRecord>> {
        let row = sqlx::query_as::<_, DbMasteryRecord>(
            r#"
            SELECT user_id, question_id, ease_factor, interval_days, repetitions,
                   next_review_at, last_reviewed_at, quality_sum, review_count
            FROM mastery_records
            WHERE user_id = $1 AND question_id = $2
            "#,
        )
        .bind(user_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.to_core()))
    }

    async fn upsert_mastery(&self, record: &MasteryRecord) -> Result<()> {
        let row = DbMasteryRecord::from_core(record);
        sqlx::query(
            r#"
            INSERT INTO mastery_records (
                user_id, question_id, ease_factor, interval_days, repetitions,
                next_review_at, last_reviewed_at, quality_sum, review_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, question_id) DO UPDATE SET
                ease_factor = EXCLUDED.ease_factor,
                interval_days = EXCLUDED.interval_days,
                repetitions = EXCLUDED.repetitions,
                next_review_at = EXCLUDED.next_review_at,
                last_reviewed_at = EXCLUDED.last_reviewed_at,
                quality_sum = EXCLUDED.quality_sum,
                review_count = EXCLUDED.review_count,
                updated_at = NOW()
            "#,
        )
        .bind(row.user_id)
        .bind(row.question_id)
        .bind(row.ease_factor)
        .bind(row.interval_days)
        .bind(row.repetitions)
        .bind(row.next_review_at)
        .bind(row.last_reviewed_at)
        .bind(row.quality_sum)
        .bind(row.review_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_mastery_for_user(&self, user_id: Uuid) -> Result<Vec<MasteryRecord>> {
        let rows = sqlx::query_as::<_, DbMasteryRecord>(
            r#"
            SELECT user_id, question_id, ease_factor, interval_days, repetitions,
                   next_review_at, last_reviewed_at, quality_sum, review_count
            FROM mastery_records
            WHERE user_id = $1
            ORDER BY question_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(DbMasteryRecord::to_core).collect())
    }

    async fn insert_review(&self, review: &ReviewLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (
                id, user_id, question_id, reviewed_at, quality, was_correct, cram_mode,
                interval_before, interval_after, ease_before, ease_after
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(review.id)
        .bind(review.user_id)
        .bind(review.question_id)
        .bind(review.reviewed_at)
        .bind(review.quality)
        .bind(review.was_correct)
        .bind(review.cram_mode)
        .bind(review.interval_before)
        .bind(review.interval_after)
        .bind(review.ease_before)
        .bind(review.ease_after)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_reviews_for_user(&self, user_id: Uuid) -> Result<usize> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reviews
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as usize)
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        let created = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (subject, prompt)
            VALUES ($1, $2)
            RETURNING id, subject, prompt, created_at
            "#,
        )
        .bind(&question.subject)
        .bind(&question.prompt)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_question(&self, question_id: i64) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, subject, prompt, created_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn list_question_ids(&self, subject: Option<&str>) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM questions
            WHERE $1::TEXT IS NULL OR subject = $1
            ORDER BY id
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn get_study_settings(&self, user_id: Uuid) -> Result<StudySettings> {
        let row = sqlx::query_as::<_, DbStudySettings>(
            r#"
            SELECT user_id, cram_mode, exam_date, daily_reset_hour
            FROM study_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|s| s.to_core()).unwrap_or_default())
    }

    async fn upsert_study_settings(&self, user_id: Uuid, settings: &StudySettings) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO study_settings (user_id, cram_mode, exam_date, daily_reset_hour)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                cram_mode = EXCLUDED.cram_mode,
                exam_date = EXCLUDED.exam_date,
                daily_reset_hour = EXCLUDED.daily_reset_hour,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(settings.cram_mode)
        .bind(settings.exam_date)
        .bind(settings.daily_reset_hour as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
