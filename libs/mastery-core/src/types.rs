//! Core types for the mastery scheduler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::sm2::INITIAL_EASE;
use crate::error::InputError;

/// Exam horizon assumed when the caller has none.
pub const DEFAULT_EXAM_DAYS: u32 = 7;

/// Spaced repetition state for one (user, question) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryRecord {
    pub user_id: Uuid,
    pub question_id: i64,
    pub ease_factor: f64,
    pub interval_days: f64,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub quality_sum: u32,
    pub review_count: u32,
}

impl MasteryRecord {
    /// Seed state for a pair that has never been reviewed.
    pub fn new(user_id: Uuid, question_id: i64) -> Self {
        Self {
            user_id,
            question_id,
            ease_factor: INITIAL_EASE,
            interval_days: 0.0,
            repetitions: 0,
            next_review_at: None,
            last_reviewed_at: None,
            quality_sum: 0,
            review_count: 0,
        }
    }

    /// A record that was never reviewed schedules exactly like a missing one.
    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }

    /// Seen at least once and scheduled at or before `now`.
    ///
    /// A seen record without a scheduled time counts as due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_new() && self.next_review_at.map_or(true, |at| at <= now)
    }

    /// Scheduled strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|at| at < now)
    }
}

/// Coarse classification derived from SM-2 state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Mastered => "mastered",
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the next interval is computed after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Long-horizon SM-2 intervals.
    Standard,
    /// Hour/day-scale intervals compressed toward an exam.
    Cram { exam_days_remaining: u32 },
}

impl Default for ScheduleMode {
    fn default() -> Self {
        Self::Standard
    }
}

impl ScheduleMode {
    /// Build from the flags a review request carries. Missing exam days fall
    /// back to [`DEFAULT_EXAM_DAYS`].
    pub fn from_flags(is_cram_mode: bool, exam_days_remaining: Option<u32>) -> Self {
        if is_cram_mode {
            Self::Cram {
                exam_days_remaining: exam_days_remaining.unwrap_or(DEFAULT_EXAM_DAYS),
            }
        } else {
            Self::Standard
        }
    }

    pub fn is_cram(&self) -> bool {
        matches!(self, Self::Cram { .. })
    }
}

/// Batch selection policy for a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    Smart,
    Cram,
    Random,
}

impl Default for PracticeMode {
    fn default() -> Self {
        Self::Smart
    }
}

impl PracticeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::Cram => "cram",
            Self::Random => "random",
        }
    }
}

impl FromStr for PracticeMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smart" => Ok(Self::Smart),
            "cram" => Ok(Self::Cram),
            "random" => Ok(Self::Random),
            other => Err(InputError::UnknownMode(other.to_string())),
        }
    }
}

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub user_id: Uuid,
    pub question_id: i64,
    pub is_correct: bool,
    pub mode: ScheduleMode,
    pub reviewed_at: DateTime<Utc>,
}

/// Dashboard summary over a user's mastery records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryStats {
    pub total_questions: usize,
    pub new_count: usize,
    pub learning_count: usize,
    pub reviewing_count: usize,
    pub mastered_count: usize,
    pub average_ease_factor: f64,
    pub due_today: usize,
    pub overdue_count: usize,
}

/// Per-user study preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySettings {
    pub cram_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    pub daily_reset_hour: u32,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            cram_mode: false,
            exam_date: None,
            daily_reset_hour: 0,
        }
    }
}

impl StudySettings {
    /// Whole days from `today` until the exam, floored at zero.
    pub fn exam_days_remaining(&self, today: NaiveDate) -> u32 {
        match self.exam_date {
            Some(exam) => {
                let days = (exam - today).num_days().max(0);
                u32::try_from(days).unwrap_or(u32::MAX)
            }
            None => DEFAULT_EXAM_DAYS,
        }
    }
}

/// Validate a requested batch size.
pub fn parse_count(count: i64) -> Result<usize, InputError> {
    usize::try_from(count).map_err(|_| InputError::NegativeCount(count))
}

/// Validate a requested exam horizon. Oversized values saturate.
pub fn parse_exam_days(days: i64) -> Result<u32, InputError> {
    if days < 0 {
        return Err(InputError::NegativeExamDays(days));
    }
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}

/// Validate an hour-of-day used to start the study day.
pub fn parse_reset_hour(hour: i64) -> Result<u32, InputError> {
    match u32::try_from(hour) {
        Ok(h) if h <= 23 => Ok(h),
        _ => Err(InputError::InvalidResetHour(hour)),
    }
}
