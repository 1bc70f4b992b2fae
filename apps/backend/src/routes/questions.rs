//! Question pool endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/questions
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewQuestion>,
) -> Result<(StatusCode, Json<Question>)> {
    if request.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("subject must not be empty".to_string()));
    }
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let question = state.store.create_question(&request).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// GET /api/questions
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<QuestionListResponse>> {
    let question_ids = state
        .store
        .list_question_ids(query.subject.as_deref())
        .await?;
    Ok(Json(QuestionListResponse { question_ids }))
}
