//! Practice endpoints

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use mastery_core::types::{parse_count, parse_exam_days};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::practice::{self, SessionPool};
use crate::AppState;

/// POST /api/practice/review
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let exam_days = request
        .exam_days_remaining
        .map(parse_exam_days)
        .transpose()?;

    let now = Utc::now();
    let settings = state.store.get_study_settings(auth.user_id).await?;
    let mode = practice::resolve_schedule_mode(
        &settings,
        request.cram_mode,
        exam_days,
        practice::study_day(now, &settings),
        state.config.default_exam_days,
    );

    let record = practice::record_review(
        state.store.as_ref(),
        auth.user_id,
        request.question_id,
        request.is_correct,
        mode,
        now,
    )
    .await?;

    Ok(Json(SubmitReviewResponse {
        mastery_level: record.level(),
        record,
    }))
}

/// POST /api/practice/session
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<PracticeSessionRequest>,
) -> Result<Json<PracticeSessionResponse>> {
    let mode: PracticeMode = request.mode.parse()?;
    let count = parse_count(request.count)?;
    let exam_days = request
        .exam_days_remaining
        .map(parse_exam_days)
        .transpose()?;

    let question_ids = practice::build_session(
        state.store.as_ref(),
        auth.user_id,
        mode,
        SessionPool {
            question_ids: request.question_ids,
            subject: request.subject,
        },
        count,
        exam_days,
        Utc::now(),
    )
    .await?;

    Ok(Json(PracticeSessionResponse { mode, question_ids }))
}
