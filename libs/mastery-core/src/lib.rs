//! Mastery scheduling engine shared by the exam-prep backend.
//!
//! Provides:
//! - SM-2 quality mapping, ease recurrence and standard intervals
//! - Exam-scaled cram intervals
//! - Review application and mastery level derivation
//! - Priority scoring and practice batch selection (smart, cram, random)
//! - Aggregate mastery statistics
//!
//! Everything here is pure computation over plain records. Persistence lives
//! with the caller.

pub mod algorithm;
pub mod date_utils;
pub mod error;
pub mod mastery;
pub mod priority;
pub mod selection;
pub mod stats;
pub mod types;

pub use algorithm::{policy_for, IntervalPolicy, SuccessContext};
pub use error::{InputError, Result};
pub use mastery::{apply_review, latest_schedulable, mastery_level};
pub use priority::priority;
pub use selection::{select_batch, select_cram, select_random, select_smart};
pub use stats::{overall_mastery, overall_mastery_at};
pub use types::{
    MasteryLevel, MasteryRecord, MasteryStats, PracticeMode, ReviewEvent, ScheduleMode,
    StudySettings, DEFAULT_EXAM_DAYS,
};
