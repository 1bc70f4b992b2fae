//! Request bodies for API tests.

use serde_json::{json, Value};

/// Body for POST /api/questions.
pub fn new_question(subject: &str, prompt: &str) -> Value {
    json!({
        "subject": subject,
        "prompt": prompt,
    })
}

/// Body for POST /api/practice/review in standard mode.
pub fn review(question_id: i64, is_correct: bool) -> Value {
    json!({
        "question_id": question_id,
        "is_correct": is_correct,
    })
}

/// Body for POST /api/practice/review forcing cram mode.
pub fn cram_review(question_id: i64, is_correct: bool, exam_days_remaining: i64) -> Value {
    json!({
        "question_id": question_id,
        "is_correct": is_correct,
        "cram_mode": true,
        "exam_days_remaining": exam_days_remaining,
    })
}

/// Body for POST /api/practice/session over the whole pool.
pub fn session(mode: &str, count: i64) -> Value {
    json!({
        "mode": mode,
        "count": count,
    })
}

/// Body for POST /api/practice/session over explicit candidates.
pub fn session_with_pool(mode: &str, count: i64, question_ids: &[i64]) -> Value {
    json!({
        "mode": mode,
        "count": count,
        "question_ids": question_ids,
    })
}

/// Approximate float comparison for JSON numbers.
pub fn approx(value: &Value, expected: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() < 1e-6)
}
