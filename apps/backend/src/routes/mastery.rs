//! Mastery endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::practice;
use crate::AppState;

/// GET /api/mastery
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MasteryListResponse>> {
    let records = state
        .store
        .list_mastery_for_user(auth.user_id)
        .await?
        .into_iter()
        .map(|r| MasteryBadge::new(r.question_id, Some(r)))
        .collect();

    Ok(Json(MasteryListResponse { records }))
}

/// GET /api/mastery/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<MasteryStatsQuery>,
) -> Result<Json<MasteryStatsResponse>> {
    let stats = practice::mastery_stats(
        state.store.as_ref(),
        auth.user_id,
        query.subject.as_deref(),
        Utc::now(),
    )
    .await?;
    let total_reviews = state.store.count_reviews_for_user(auth.user_id).await?;

    Ok(Json(MasteryStatsResponse {
        stats,
        total_reviews,
    }))
}

/// GET /api/mastery/:question_id
pub async fn badge(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(question_id): Path<i64>,
) -> Result<Json<MasteryBadge>> {
    if state.store.get_question(question_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Question {question_id}")));
    }

    let record = state.store.get_mastery(auth.user_id, question_id).await?;
    Ok(Json(MasteryBadge::new(question_id, record)))
}
