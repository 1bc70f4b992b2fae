//! Review application and mastery level derivation.

use chrono::{DateTime, Duration, Utc};

use crate::algorithm::sm2::{map_to_quality, update_ease, PASSING_QUALITY};
use crate::algorithm::{policy_for, SuccessContext};
use crate::types::{MasteryLevel, MasteryRecord, ReviewEvent};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// 9999-12-31T23:59:59Z, the last instant with a four-digit RFC 3339 year.
const LATEST_SCHEDULE_SECS: i64 = 253_402_300_799;

/// Repetitions below this are still being learned.
const LEARNING_REPETITIONS: u32 = 3;
const MASTERED_REPETITIONS: u32 = 6;
const MASTERED_EASE: f64 = 2.0;

/// Apply one review to the current state of a (user, question) pair.
///
/// `current` is `None` for a pair that has never been reviewed; the seed state
/// is used in that case. Ease is recomputed on every review, pass or fail.
pub fn apply_review(current: Option<&MasteryRecord>, event: &ReviewEvent) -> MasteryRecord {
    let prior = current
        .cloned()
        .unwrap_or_else(|| MasteryRecord::new(event.user_id, event.question_id));
    let policy = policy_for(event.mode);

    let quality = map_to_quality(event.is_correct);
    let ease_factor = update_ease(prior.ease_factor, quality);

    let (repetitions, interval_days) = if quality < PASSING_QUALITY {
        (0, policy.lapse_interval())
    } else {
        let repetitions = prior.repetitions + 1;
        let ctx = SuccessContext {
            previous_repetitions: prior.repetitions,
            repetitions,
            ease_factor,
            previous_interval_days: prior.interval_days,
        };
        (repetitions, policy.success_interval(&ctx))
    };
    let interval_days = interval_days.max(0.0);

    MasteryRecord {
        user_id: prior.user_id,
        question_id: prior.question_id,
        ease_factor,
        interval_days,
        repetitions,
        next_review_at: Some(add_days(event.reviewed_at, interval_days)),
        last_reviewed_at: Some(event.reviewed_at),
        quality_sum: prior.quality_sum + u32::from(quality),
        review_count: prior.review_count + 1,
    }
}

/// Derive the display level from SM-2 state.
pub fn mastery_level(repetitions: u32, ease_factor: f64, review_count: u32) -> MasteryLevel {
    if review_count == 0 {
        MasteryLevel::New
    } else if repetitions < LEARNING_REPETITIONS {
        MasteryLevel::Learning
    } else if repetitions >= MASTERED_REPETITIONS && ease_factor >= MASTERED_EASE {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Reviewing
    }
}

impl MasteryRecord {
    pub fn level(&self) -> MasteryLevel {
        mastery_level(self.repetitions, self.ease_factor, self.review_count)
    }
}

/// Latest time a review can be scheduled for. Every store round-trips it.
pub fn latest_schedulable() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_SCHEDULE_SECS, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Add a fractional number of days at millisecond precision, capped at
/// [`latest_schedulable`].
pub fn add_days(at: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let millis = (days * MILLIS_PER_DAY).round() as i64;
    let latest = latest_schedulable();
    at.checked_add_signed(Duration::milliseconds(millis))
        .map_or(latest, |due| due.min(latest))
}
