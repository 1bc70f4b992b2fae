//! Dashboard-level mastery statistics.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::algorithm::sm2::INITIAL_EASE;
use crate::date_utils::today_window;
use crate::types::{MasteryLevel, MasteryRecord, MasteryStats};

/// Summarize a user's records against a pool of `total_questions`.
///
/// "Today" runs from UTC midnight to the next UTC midnight.
pub fn overall_mastery(
    records: &[MasteryRecord],
    total_questions: usize,
    now: DateTime<Utc>,
) -> MasteryStats {
    overall_mastery_at(records, total_questions, now, 0)
}

/// Same as [`overall_mastery`], with the study day starting at
/// `daily_reset_hour`.
pub fn overall_mastery_at(
    records: &[MasteryRecord],
    total_questions: usize,
    now: DateTime<Utc>,
    daily_reset_hour: u32,
) -> MasteryStats {
    let (_, tomorrow) = today_window(now, daily_reset_hour);

    let mut learning_count = 0;
    let mut reviewing_count = 0;
    let mut mastered_count = 0;
    let mut due_today = 0;
    let mut overdue_count = 0;
    let mut reviewed: HashSet<i64> = HashSet::new();

    for record in records {
        match record.level() {
            MasteryLevel::New => {}
            MasteryLevel::Learning => learning_count += 1,
            MasteryLevel::Reviewing => reviewing_count += 1,
            MasteryLevel::Mastered => mastered_count += 1,
        }
        if !record.is_new() {
            reviewed.insert(record.question_id);
        }
        if let Some(next) = record.next_review_at {
            if next < tomorrow {
                due_today += 1;
            }
            if next < now {
                overdue_count += 1;
            }
        }
    }

    let average_ease_factor = if records.is_empty() {
        INITIAL_EASE
    } else {
        records.iter().map(|r| r.ease_factor).sum::<f64>() / records.len() as f64
    };

    MasteryStats {
        total_questions,
        new_count: total_questions.saturating_sub(reviewed.len()),
        learning_count,
        reviewing_count,
        mastered_count,
        average_ease_factor,
        due_today,
        overdue_count,
    }
}
