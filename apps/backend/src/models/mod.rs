//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from mastery-core
pub use mastery_core::types::{
    MasteryLevel, MasteryRecord, MasteryStats, PracticeMode, ReviewEvent, ScheduleMode,
    StudySettings,
};

// === Database Entity Types ===

/// Question in the practice pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub subject: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// Question to add to the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub subject: String,
    pub prompt: String,
}

/// Mastery state in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMasteryRecord {
    pub user_id: Uuid,
    pub question_id: i64,
    pub ease_factor: f64,
    pub interval_days: f64,
    pub repetitions: i32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub quality_sum: i32,
    pub review_count: i32,
}

impl DbMasteryRecord {
    /// Create from mastery-core MasteryRecord
    pub fn from_core(record: &MasteryRecord) -> Self {
        Self {
            user_id: record.user_id,
            question_id: record.question_id,
            ease_factor: record.ease_factor,
            interval_days: record.interval_days,
            repetitions: clamp_i32(record.repetitions),
            next_review_at: record.next_review_at,
            last_reviewed_at: record.last_reviewed_at,
            quality_sum: clamp_i32(record.quality_sum),
            review_count: clamp_i32(record.review_count),
        }
    }

    /// Convert to mastery-core MasteryRecord
    pub fn to_core(&self) -> MasteryRecord {
        MasteryRecord {
            user_id: self.user_id,
            question_id: self.question_id,
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions.max(0) as u32,
            next_review_at: self.next_review_at,
            last_reviewed_at: self.last_reviewed_at,
            quality_sum: self.quality_sum.max(0) as u32,
            review_count: self.review_count.max(0) as u32,
        }
    }
}

fn clamp_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Review history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReviewLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: i64,
    pub reviewed_at: DateTime<Utc>,
    pub quality: i32,
    pub was_correct: bool,
    pub cram_mode: bool,
    pub interval_before: f64,
    pub interval_after: f64,
    pub ease_before: f64,
    pub ease_after: f64,
}

impl ReviewLog {
    /// Describe the transition from `before` (if any) to `after`.
    pub fn from_transition(
        before: Option<&MasteryRecord>,
        after: &MasteryRecord,
        event: &ReviewEvent,
    ) -> Self {
        let quality = after.quality_sum - before.map_or(0, |b| b.quality_sum);
        Self {
            id: Uuid::new_v4(),
            user_id: event.user_id,
            question_id: event.question_id,
            reviewed_at: event.reviewed_at,
            quality: clamp_i32(quality),
            was_correct: event.is_correct,
            cram_mode: event.mode.is_cram(),
            interval_before: before.map_or(0.0, |b| b.interval_days),
            interval_after: after.interval_days,
            ease_before: before.map_or(mastery_core::algorithm::sm2::INITIAL_EASE, |b| b.ease_factor),
            ease_after: after.ease_factor,
        }
    }
}

/// Study settings in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudySettings {
    pub user_id: Uuid,
    pub cram_mode: bool,
    pub exam_date: Option<NaiveDate>,
    pub daily_reset_hour: i32,
}

impl DbStudySettings {
    /// Convert to mastery-core StudySettings
    pub fn to_core(&self) -> StudySettings {
        StudySettings {
            cram_mode: self.cram_mode,
            exam_date: self.exam_date,
            daily_reset_hour: self.daily_reset_hour.clamp(0, 23) as u32,
        }
    }
}

// === API Request/Response Types ===

// Question types
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub question_ids: Vec<i64>,
}

// Practice types
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub question_id: i64,
    pub is_correct: bool,
    /// Overrides the user's study settings when present.
    pub cram_mode: Option<bool>,
    pub exam_days_remaining: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub record: MasteryRecord,
    pub mastery_level: MasteryLevel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PracticeSessionRequest {
    pub mode: String,
    pub count: i64,
    /// Candidate pool; defaults to every question (optionally by subject).
    pub question_ids: Option<Vec<i64>>,
    pub subject: Option<String>,
    pub exam_days_remaining: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PracticeSessionResponse {
    pub mode: PracticeMode,
    pub question_ids: Vec<i64>,
}

// Mastery types
#[derive(Debug, Serialize, Deserialize)]
pub struct MasteryBadge {
    pub question_id: i64,
    pub level: MasteryLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MasteryRecord>,
}

impl MasteryBadge {
    pub fn new(question_id: i64, record: Option<MasteryRecord>) -> Self {
        let level = record
            .as_ref()
            .map_or(MasteryLevel::New, MasteryRecord::level);
        Self {
            question_id,
            level,
            record,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasteryListResponse {
    pub records: Vec<MasteryBadge>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasteryStatsQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MasteryStatsResponse {
    #[serde(flatten)]
    pub stats: MasteryStats,
    pub total_reviews: usize,
}

// Settings types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateStudySettingsRequest {
    pub cram_mode: Option<bool>,
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_exam_date: bool,
    pub daily_reset_hour: Option<i64>,
}
