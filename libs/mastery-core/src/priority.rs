//! Review priority scoring. Lower scores are more urgent.
//!
//! The coefficients are empirically tuned and only the composite ordering
//! matters.

use chrono::{DateTime, Utc};

use crate::algorithm::sm2::MINIMUM_EASE;
use crate::types::{MasteryLevel, MasteryRecord};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const OVERDUE_WEIGHT: f64 = 10.0;
const OVERDUE_CAP: f64 = 50.0;
const NOT_DUE_WEIGHT: f64 = 5.0;
const NOT_DUE_CAP: f64 = 100.0;
const EASE_WEIGHT: f64 = 20.0;
const REPETITION_WEIGHT: f64 = 5.0;

fn base_score(level: MasteryLevel) -> f64 {
    match level {
        MasteryLevel::New => 0.0,
        MasteryLevel::Learning => 100.0,
        MasteryLevel::Reviewing => 200.0,
        MasteryLevel::Mastered => 300.0,
    }
}

/// Ranking scalar for a question at `now`. A missing or never-reviewed
/// record scores 0.
pub fn priority(record: Option<&MasteryRecord>, now: DateTime<Utc>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };
    if record.is_new() {
        return 0.0;
    }

    let mut score = base_score(record.level());

    if let Some(next) = record.next_review_at {
        let overdue_days = (now - next).num_milliseconds() as f64 / MILLIS_PER_DAY;
        if overdue_days > 0.0 {
            score -= (overdue_days * OVERDUE_WEIGHT).min(OVERDUE_CAP);
        } else {
            score += (overdue_days.abs() * NOT_DUE_WEIGHT).min(NOT_DUE_CAP);
        }
    }

    score -= (record.ease_factor - MINIMUM_EASE) * EASE_WEIGHT;
    score += f64::from(record.repetitions) * REPETITION_WEIGHT;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn record(repetitions: u32, ease: f64, review_count: u32, next: Option<DateTime<Utc>>) -> MasteryRecord {
        MasteryRecord {
            repetitions,
            ease_factor: ease,
            review_count,
            next_review_at: next,
            ..MasteryRecord::new(Uuid::nil(), 1)
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn missing_record_is_most_urgent() {
        assert_eq!(priority(None, now()), 0.0);
    }

    #[test]
    fn learning_due_now() {
        // 100 - (2.5 - 1.3) * 20 + 1 * 5
        let r = record(1, 2.5, 1, Some(now()));
        assert!(approx(priority(Some(&r), now()), 81.0));
    }

    #[test]
    fn overdue_pull_is_capped() {
        let slightly = record(1, 2.5, 1, Some(now() - Duration::days(2)));
        let very = record(1, 2.5, 1, Some(now() - Duration::days(30)));
        assert!(approx(priority(Some(&slightly), now()), 61.0));
        assert!(approx(priority(Some(&very), now()), 31.0));
    }

    #[test]
    fn future_push_is_capped() {
        let soon = record(3, 2.5, 3, Some(now() + Duration::days(4)));
        let far = record(3, 2.5, 3, Some(now() + Duration::days(400)));
        // 200 + 20 - 24 + 15
        assert!(approx(priority(Some(&soon), now()), 211.0));
        assert!(approx(priority(Some(&far), now()), 291.0));
    }

    #[test]
    fn ease_term_scales_from_minimum() {
        let floor = record(1, 1.3, 2, Some(now()));
        let ceiling = record(1, 2.5, 2, Some(now()));
        assert!(approx(priority(Some(&floor), now()), 105.0));
        assert!(approx(priority(Some(&ceiling), now()), 81.0));
    }

    #[test]
    fn unreviewed_record_scores_like_missing() {
        let seeded = MasteryRecord::new(Uuid::nil(), 1);
        assert_eq!(seeded.ease_factor, 2.5);
        assert_eq!(priority(Some(&seeded), now()), priority(None, now()));
    }

    #[test]
    fn seen_record_without_due_date_skips_overdue_term() {
        // 100 - 24 + 0
        let r = record(0, 2.5, 1, None);
        assert!(approx(priority(Some(&r), now()), 76.0));
    }
}
