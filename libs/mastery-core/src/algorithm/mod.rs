//! Interval policies used by the mastery state machine.

pub mod cram;
pub mod sm2;

use crate::types::ScheduleMode;

/// What an interval policy sees after a successful review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessContext {
    /// Consecutive successes before this review.
    pub previous_repetitions: u32,
    /// Consecutive successes including this review.
    pub repetitions: u32,
    /// Ease factor after this review's update.
    pub ease_factor: f64,
    pub previous_interval_days: f64,
}

/// Trait for interval policies.
pub trait IntervalPolicy: Send + Sync {
    /// Days until the next review after a failed answer.
    fn lapse_interval(&self) -> f64;

    /// Days until the next review after a successful answer.
    fn success_interval(&self, ctx: &SuccessContext) -> f64;
}

/// Get the policy for a schedule mode.
pub fn policy_for(mode: ScheduleMode) -> Box<dyn IntervalPolicy> {
    match mode {
        ScheduleMode::Standard => Box::new(sm2::Sm2),
        ScheduleMode::Cram {
            exam_days_remaining,
        } => Box::new(cram::Cram::new(exam_days_remaining)),
    }
}
