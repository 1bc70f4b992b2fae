//! SQLite store for single-node deployments

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::schema::SCHEMA;
use super::MasteryStore;
use crate::error::{ApiError, Result};
use crate::models::{MasteryRecord, NewQuestion, Question, ReviewLog, StudySettings};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store backed by a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ApiError::Internal("sqlite connection lock poisoned".to_string()))
    }

    fn row_to_mastery(user_id: Uuid, row: &rusqlite::Row) -> rusqlite::Result<MasteryRecord> {
        Ok(MasteryRecord {
            user_id,
            question_id: row.get(0)?,
            ease_factor: row.get(1)?,
            interval_days: row.get(2)?,
            repetitions: row.get(3)?,
            next_review_at: parse_timestamp(row.get(4)?),
            last_reviewed_at: parse_timestamp(row.get(5)?),
            quality_sum: row.get(6)?,
            review_count: row.get(7)?,
        })
    }

    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            subject: row.get(1)?,
            prompt: row.get(2)?,
            created_at: parse_timestamp(row.get(3)?).unwrap_or_default(),
        })
    }
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

#[async_trait]
impl MasteryStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn get_mastery(&self, user_id: Uuid, question_id: i64) -> Result<Option<MasteryRecord>> {
        self.conn()?
            .query_row(
                "SELECT question_id, ease_factor, interval_days, repetitions, next_review_at,
                        last_reviewed_at, quality_sum, review_count
                 FROM mastery_records WHERE user_id = ?1 AND question_id = ?2",
                params![user_id.to_string(), question_id],
                |row| Self::row_to_mastery(user_id, row),
            )
            .optional()
            .map_err(Into::into)
    }

    async fn upsert_mastery(&self, record: &MasteryRecord) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO mastery_records (
                 user_id, question_id, ease_factor, interval_days, repetitions,
                 next_review_at, last_reviewed_at, quality_sum, review_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (user_id, question_id) DO UPDATE SET
                 ease_factor = excluded.ease_factor,
                 interval_days = excluded.interval_days,
                 repetitions = excluded.repetitions,
                 next_review_at = excluded.next_review_at,
                 last_reviewed_at = excluded.last_reviewed_at,
                 quality_sum = excluded.quality_sum,
                 review_count = excluded.review_count",
            params![
                record.user_id.to_string(),
                record.question_id,
                record.ease_factor,
                record.interval_days,
                record.repetitions,
                record.next_review_at.map(|d| d.to_rfc3339()),
                record.last_reviewed_at.map(|d| d.to_rfc3339()),
                record.quality_sum,
                record.review_count,
            ],
        )?;
        Ok(())
    }

    async fn list_mastery_for_user(&self, user_id: Uuid) -> Result<Vec<MasteryRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT question_id, ease_factor, interval_days, repetitions, next_review_at,
                    last_reviewed_at, quality_sum, review_count
             FROM mastery_records WHERE user_id = ?1 ORDER BY question_id",
        )?;
        let records = stmt
            .query_map(params![user_id.to_string()], |row| {
                Self::row_to_mastery(user_id, row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    async fn insert_review(&self, review: &ReviewLog) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO reviews (
                 id, user_id, question_id, reviewed_at, quality, was_correct, cram_mode,
                 interval_before, interval_after, ease_before, ease_after)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                review.id.to_string(),
                review.user_id.to_string(),
                review.question_id,
                review.reviewed_at.to_rfc3339(),
                review.quality,
                review.was_correct,
                review.cram_mode,
                review.interval_before,
                review.interval_after,
                review.ease_before,
                review.ease_after,
            ],
        )?;
        Ok(())
    }

    async fn count_reviews_for_user(&self, user_id: Uuid) -> Result<usize> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM reviews WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO questions (subject, prompt, created_at) VALUES (?1, ?2, ?3)",
            params![question.subject, question.prompt, created_at.to_rfc3339()],
        )?;
        Ok(Question {
            id: conn.last_insert_rowid(),
            subject: question.subject.clone(),
            prompt: question.prompt.clone(),
            created_at,
        })
    }

    async fn get_question(&self, question_id: i64) -> Result<Option<Question>> {
        self.conn()?
            .query_row(
                "SELECT id, subject, prompt, created_at FROM questions WHERE id = ?1",
                params![question_id],
                Self::row_to_question,
            )
            .optional()
            .map_err(Into::into)
    }

    async fn list_question_ids(&self, subject: Option<&str>) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM questions WHERE ?1 IS NULL OR subject = ?1 ORDER BY id",
        )?;
        let ids = stmt
            .query_map(params![subject], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    async fn get_study_settings(&self, user_id: Uuid) -> Result<StudySettings> {
        let settings = self
            .conn()?
            .query_row(
                "SELECT cram_mode, exam_date, daily_reset_hour FROM study_settings WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok(StudySettings {
                        cram_mode: row.get(0)?,
                        exam_date: row
                            .get::<_, Option<String>>(1)?
                            .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
                        daily_reset_hour: row.get::<_, u32>(2)?.min(23),
                    })
                },
            )
            .optional()?;
        Ok(settings.unwrap_or_default())
    }

    async fn upsert_study_settings(&self, user_id: Uuid, settings: &StudySettings) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO study_settings (user_id, cram_mode, exam_date, daily_reset_hour)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id) DO UPDATE SET
                 cram_mode = excluded.cram_mode,
                 exam_date = excluded.exam_date,
                 daily_reset_hour = excluded.daily_reset_hour",
            params![
                user_id.to_string(),
                settings.cram_mode,
                settings.exam_date.map(|d| d.format(DATE_FORMAT).to_string()),
                settings.daily_reset_hour,
            ],
        )?;
        Ok(())
    }
}
