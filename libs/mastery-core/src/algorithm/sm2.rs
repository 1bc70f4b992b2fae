//! SM-2 spaced repetition algorithm.
//!
//! Quality is fixed to two values (4 for a correct answer, 1 for an incorrect
//! one). The ease ceiling equals the seed, so ease only ever moves down from
//! its starting value.

use super::{IntervalPolicy, SuccessContext};

pub const INITIAL_EASE: f64 = 2.5;
pub const MINIMUM_EASE: f64 = 1.3;
pub const MAXIMUM_EASE: f64 = INITIAL_EASE;

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// "Correct with hesitation".
const QUALITY_CORRECT: u8 = 4;
/// "Blackout".
const QUALITY_INCORRECT: u8 = 1;

/// Map a binary correctness signal to SM-2 quality.
pub fn map_to_quality(is_correct: bool) -> u8 {
    if is_correct {
        QUALITY_CORRECT
    } else {
        QUALITY_INCORRECT
    }
}

/// SM-2 ease recurrence, clamped to `[MINIMUM_EASE, MAXIMUM_EASE]`.
pub fn update_ease(current: f64, quality: u8) -> f64 {
    let miss = 5.0 - f64::from(quality.min(5));
    let delta = 0.1 - miss * (0.08 + miss * 0.02);
    (current + delta).clamp(MINIMUM_EASE, MAXIMUM_EASE)
}

/// Standard interval in days, keyed by the successes preceding this one.
pub fn next_interval(repetitions: u32, ease_factor: f64, previous_interval_days: f64) -> f64 {
    match repetitions {
        0 => 1.0,
        1 => 6.0,
        _ => (previous_interval_days * ease_factor).round(),
    }
}

/// Long-horizon SM-2 intervals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sm2;

impl IntervalPolicy for Sm2 {
    fn lapse_interval(&self) -> f64 {
        1.0
    }

    fn success_interval(&self, ctx: &SuccessContext) -> f64 {
        next_interval(
            ctx.previous_repetitions,
            ctx.ease_factor,
            ctx.previous_interval_days,
        )
    }
}
