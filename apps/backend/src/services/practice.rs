//! Review recording, session building and mastery summaries.
//!
//! Storage-agnostic glue between the HTTP handlers and the pure scheduler in
//! `mastery-core`.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use mastery_core::date_utils::today_window;
use mastery_core::{apply_review, overall_mastery_at, select_batch};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::store::MasteryStore;

/// The calendar date of the study day containing `now`.
pub fn study_day(now: DateTime<Utc>, settings: &StudySettings) -> NaiveDate {
    today_window(now, settings.daily_reset_hour).0.date_naive()
}

/// Pick the interval policy for a review.
///
/// Request flags win over stored settings. The exam horizon comes from the
/// request, then the user's exam date, then `default_exam_days`.
pub fn resolve_schedule_mode(
    settings: &StudySettings,
    cram_override: Option<bool>,
    exam_days_override: Option<u32>,
    today: NaiveDate,
    default_exam_days: u32,
) -> ScheduleMode {
    let is_cram = cram_override.unwrap_or(settings.cram_mode);
    let exam_days = exam_days_override
        .or_else(|| settings.exam_date.map(|_| settings.exam_days_remaining(today)))
        .unwrap_or(default_exam_days);
    ScheduleMode::from_flags(is_cram, Some(exam_days))
}

/// Apply one answer to the stored mastery record and log it.
pub async fn record_review(
    store: &dyn MasteryStore,
    user_id: Uuid,
    question_id: i64,
    is_correct: bool,
    mode: ScheduleMode,
    now: DateTime<Utc>,
) -> Result<MasteryRecord> {
    if store.get_question(question_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Question {question_id}")));
    }

    let current = store.get_mastery(user_id, question_id).await?;
    let event = ReviewEvent {
        user_id,
        question_id,
        is_correct,
        mode,
        reviewed_at: now,
    };
    let updated = apply_review(current.as_ref(), &event);

    store.upsert_mastery(&updated).await?;
    store
        .insert_review(&ReviewLog::from_transition(current.as_ref(), &updated, &event))
        .await?;

    tracing::debug!(
        %user_id,
        question_id,
        is_correct,
        cram = mode.is_cram(),
        ease = updated.ease_factor,
        interval_days = updated.interval_days,
        level = %updated.level(),
        "review recorded"
    );

    Ok(updated)
}

/// Where a session draws its candidates from.
#[derive(Debug, Clone, Default)]
pub struct SessionPool {
    /// Explicit candidates. Takes precedence over `subject`.
    pub question_ids: Option<Vec<i64>>,
    pub subject: Option<String>,
}

/// Choose the next `count` questions for a user.
pub async fn build_session(
    store: &dyn MasteryStore,
    user_id: Uuid,
    mode: PracticeMode,
    pool: SessionPool,
    count: usize,
    exam_days_remaining: Option<u32>,
    now: DateTime<Utc>,
) -> Result<Vec<i64>> {
    let candidates = match pool.question_ids {
        Some(ids) => ids,
        None => store.list_question_ids(pool.subject.as_deref()).await?,
    };

    let mastery: HashMap<i64, MasteryRecord> = match mode {
        PracticeMode::Random => HashMap::new(),
        PracticeMode::Smart | PracticeMode::Cram => store
            .list_mastery_for_user(user_id)
            .await?
            .into_iter()
            .map(|r| (r.question_id, r))
            .collect(),
    };

    let selected = select_batch(mode, &candidates, &mastery, count, now);

    tracing::info!(
        %user_id,
        mode = mode.as_str(),
        candidates = candidates.len(),
        requested = count,
        selected = selected.len(),
        exam_days_remaining,
        "practice session built"
    );

    Ok(selected)
}

/// Aggregate mastery over the user's question pool.
///
/// Records for questions outside the pool are ignored.
pub async fn mastery_stats(
    store: &dyn MasteryStore,
    user_id: Uuid,
    subject: Option<&str>,
    now: DateTime<Utc>,
) -> Result<MasteryStats> {
    let pool: HashSet<i64> = store.list_question_ids(subject).await?.into_iter().collect();
    let records: Vec<MasteryRecord> = store
        .list_mastery_for_user(user_id)
        .await?
        .into_iter()
        .filter(|r| pool.contains(&r.question_id))
        .collect();
    let settings = store.get_study_settings(user_id).await?;

    Ok(overall_mastery_at(
        &records,
        pool.len(),
        now,
        settings.daily_reset_hour,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 12, 0, 0).unwrap()
    }

    async fn seeded_store(subjects: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for subject in subjects {
            store
                .create_question(&NewQuestion {
                    subject: subject.to_string(),
                    prompt: "Q".to_string(),
                })
                .await
                .unwrap();
        }
        store
    }

    #[test]
    fn test_resolve_mode_prefers_request_flags() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let settings = StudySettings {
            cram_mode: true,
            exam_date: Some(today + Duration::days(3)),
            daily_reset_hour: 0,
        };

        assert_eq!(
            resolve_schedule_mode(&settings, None, None, today, 7),
            ScheduleMode::Cram {
                exam_days_remaining: 3
            }
        );
        assert_eq!(
            resolve_schedule_mode(&settings, None, Some(10), today, 7),
            ScheduleMode::Cram {
                exam_days_remaining: 10
            }
        );
        assert_eq!(
            resolve_schedule_mode(&settings, Some(false), None, today, 7),
            ScheduleMode::Standard
        );
        assert_eq!(
            resolve_schedule_mode(&StudySettings::default(), Some(true), None, today, 5),
            ScheduleMode::Cram {
                exam_days_remaining: 5
            }
        );
    }

    #[test]
    fn test_study_day_respects_reset_hour() {
        let settings = StudySettings {
            daily_reset_hour: 4,
            ..StudySettings::default()
        };
        let early = Utc.with_ymd_and_hms(2024, 5, 6, 2, 0, 0).unwrap();
        assert_eq!(study_day(early, &settings), NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        assert_eq!(study_day(now(), &settings), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    }

    #[tokio::test]
    async fn test_record_review_persists_and_logs() {
        let store = seeded_store(&["math"]).await;
        let user = Uuid::new_v4();

        let first = record_review(&store, user, 1, false, ScheduleMode::Standard, now())
            .await
            .unwrap();
        assert!((first.ease_factor - 1.96).abs() < 1e-9);
        assert_eq!(first.interval_days, 1.0);

        let second = record_review(&store, user, 1, true, ScheduleMode::Standard, now())
            .await
            .unwrap();
        assert_eq!(second.repetitions, 1);
        assert_eq!(second.review_count, 2);

        assert_eq!(store.get_mastery(user, 1).await.unwrap(), Some(second));
        assert_eq!(store.count_reviews_for_user(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_record_review_unknown_question() {
        let store = seeded_store(&[]).await;
        let result = record_review(&store, Uuid::new_v4(), 42, true, ScheduleMode::Standard, now()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_build_session_smart_puts_due_first() {
        let store = seeded_store(&["math", "math", "math", "bio"]).await;
        let user = Uuid::new_v4();
        let yesterday = now() - Duration::days(2);
        record_review(&store, user, 3, true, ScheduleMode::Standard, yesterday)
            .await
            .unwrap();

        let batch = build_session(
            &store,
            user,
            PracticeMode::Smart,
            SessionPool::default(),
            2,
            None,
            now(),
        )
        .await
        .unwrap();
        assert_eq!(batch, vec![3, 1]);

        let bio_only = build_session(
            &store,
            user,
            PracticeMode::Cram,
            SessionPool {
                question_ids: None,
                subject: Some("bio".to_string()),
            },
            10,
            Some(3),
            now(),
        )
        .await
        .unwrap();
        assert_eq!(bio_only, vec![4]);
    }

    #[tokio::test]
    async fn test_build_session_explicit_pool() {
        let store = seeded_store(&["math"]).await;
        let batch = build_session(
            &store,
            Uuid::new_v4(),
            PracticeMode::Random,
            SessionPool {
                question_ids: Some(vec![7, 8, 7]),
                subject: Some("ignored".to_string()),
            },
            5,
            None,
            now(),
        )
        .await
        .unwrap();
        let mut sorted = batch.clone();
        sorted.sort();
        assert_eq!(sorted, vec![7, 8]);
    }

    #[tokio::test]
    async fn test_mastery_stats_scoped_to_subject() {
        let store = seeded_store(&["math", "math", "bio"]).await;
        let user = Uuid::new_v4();
        record_review(&store, user, 1, true, ScheduleMode::Standard, now())
            .await
            .unwrap();
        record_review(&store, user, 3, false, ScheduleMode::Standard, now())
            .await
            .unwrap();

        let all = mastery_stats(&store, user, None, now()).await.unwrap();
        assert_eq!(all.total_questions, 3);
        assert_eq!(all.new_count, 1);
        assert_eq!(all.learning_count, 2);

        let math = mastery_stats(&store, user, Some("math"), now()).await.unwrap();
        assert_eq!(math.total_questions, 2);
        assert_eq!(math.new_count, 1);
        assert_eq!(math.learning_count, 1);
        assert!((math.average_ease_factor - 2.5).abs() < 1e-9);
    }
}
