//! SQLite schema definitions.

/// Complete schema for the SQLite store. Timestamps are RFC 3339 strings,
/// user ids are hyphenated UUID text.
pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- Questions available for practice
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT NOT NULL,
    prompt TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_questions_subject ON questions(subject);

-- Spaced repetition state per (user, question)
CREATE TABLE IF NOT EXISTS mastery_records (
    user_id TEXT NOT NULL,
    question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    interval_days REAL NOT NULL DEFAULT 0,
    repetitions INTEGER NOT NULL DEFAULT 0,
    next_review_at TEXT,
    last_reviewed_at TEXT,
    quality_sum INTEGER NOT NULL DEFAULT 0,
    review_count INTEGER NOT NULL DEFAULT 0,
    UNIQUE (user_id, question_id)
);

-- Append-only review history
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    question_id INTEGER NOT NULL REFERENCES questions(id) ON DELETE CASCADE,
    reviewed_at TEXT NOT NULL,
    quality INTEGER NOT NULL,
    was_correct INTEGER NOT NULL,
    cram_mode INTEGER NOT NULL,
    interval_before REAL NOT NULL,
    interval_after REAL NOT NULL,
    ease_before REAL NOT NULL,
    ease_after REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id);

-- Per-user study preferences
CREATE TABLE IF NOT EXISTS study_settings (
    user_id TEXT PRIMARY KEY,
    cram_mode INTEGER NOT NULL DEFAULT 0,
    exam_date TEXT,
    daily_reset_hour INTEGER NOT NULL DEFAULT 0
);
"#;
