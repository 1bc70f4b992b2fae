//! Compressed intervals for studying toward a near exam date.
//!
//! A fixed hour/day ladder is scaled by the exam horizon relative to one week,
//! so a 7-day horizon uses the ladder as-is and shorter horizons squeeze it
//! (never below half).

use super::{IntervalPolicy, SuccessContext};

/// 1h, 4h, 8h, 1 day, 2 days.
pub const BASE_SCHEDULE_DAYS: [f64; 5] = [1.0 / 24.0, 4.0 / 24.0, 8.0 / 24.0, 1.0, 2.0];

const REFERENCE_HORIZON_DAYS: f64 = 7.0;
const MINIMUM_SCALE: f64 = 0.5;

/// Horizon scale applied to the base ladder.
pub fn scale_factor(exam_days_remaining: u32) -> f64 {
    (f64::from(exam_days_remaining) / REFERENCE_HORIZON_DAYS).max(MINIMUM_SCALE)
}

/// Cram interval in days for the given repetition count.
///
/// Past the end of the ladder the last step grows linearly with repetitions.
pub fn cram_interval(repetitions: u32, exam_days_remaining: u32) -> f64 {
    let scale = scale_factor(exam_days_remaining);
    let index = repetitions as usize;
    match BASE_SCHEDULE_DAYS.get(index) {
        Some(base) => base * scale,
        None => {
            let last = BASE_SCHEDULE_DAYS[BASE_SCHEDULE_DAYS.len() - 1];
            let steps = (index - BASE_SCHEDULE_DAYS.len() + 2) as f64;
            last * scale * steps
        }
    }
}

/// Cram policy bound to an exam horizon.
#[derive(Debug, Clone, Copy)]
pub struct Cram {
    pub exam_days_remaining: u32,
}

impl Cram {
    pub fn new(exam_days_remaining: u32) -> Self {
        Self {
            exam_days_remaining,
        }
    }
}

impl IntervalPolicy for Cram {
    fn lapse_interval(&self) -> f64 {
        cram_interval(0, self.exam_days_remaining)
    }

    fn success_interval(&self, ctx: &SuccessContext) -> f64 {
        cram_interval(ctx.repetitions, self.exam_days_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn week_horizon_uses_ladder_unscaled() {
        assert!(approx(cram_interval(0, 7), 1.0 / 24.0));
        assert!(approx(cram_interval(1, 7), 4.0 / 24.0));
        assert!(approx(cram_interval(4, 7), 2.0));
    }

    #[test]
    fn short_horizon_scale_is_floored() {
        assert_eq!(scale_factor(0), 0.5);
        assert_eq!(scale_factor(2), 0.5);
        assert!(approx(scale_factor(14), 2.0));
        assert!(approx(cram_interval(3, 1), 0.5));
    }

    #[test]
    fn beyond_ladder_extrapolates_linearly() {
        assert!(approx(cram_interval(5, 7), 4.0));
        assert!(approx(cram_interval(6, 7), 6.0));
        assert!(approx(cram_interval(7, 14), 16.0));
    }

    #[test]
    fn more_repetitions_never_shorten_the_gap() {
        for days in [0, 1, 3, 7, 30] {
            let mut previous = 0.0;
            for reps in 0..12 {
                let interval = cram_interval(reps, days);
                assert!(interval >= previous, "reps {reps} days {days}");
                previous = interval;
            }
        }
    }

    #[test]
    fn policy_lapse_restarts_ladder() {
        let cram = Cram::new(7);
        assert!(approx(cram.lapse_interval(), 1.0 / 24.0));
        let ctx = SuccessContext {
            previous_repetitions: 0,
            repetitions: 1,
            ease_factor: 2.5,
            previous_interval_days: 0.0,
        };
        assert!(approx(cram.success_interval(&ctx), 4.0 / 24.0));
    }
}
