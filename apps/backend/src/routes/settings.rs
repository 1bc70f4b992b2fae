//! Study settings endpoints

use axum::{extract::State, Extension, Json};
use mastery_core::types::parse_reset_hour;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/settings/study
pub async fn get_study(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<StudySettings>> {
    let settings = state.store.get_study_settings(auth.user_id).await?;
    Ok(Json(settings))
}

/// PUT /api/settings/study
pub async fn update_study(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateStudySettingsRequest>,
) -> Result<Json<StudySettings>> {
    // Validate before touching stored state
    let reset_hour = request.daily_reset_hour.map(parse_reset_hour).transpose()?;

    let mut current = state.store.get_study_settings(auth.user_id).await?;

    if let Some(cram_mode) = request.cram_mode {
        current.cram_mode = cram_mode;
    }
    if request.clear_exam_date {
        current.exam_date = None;
    } else if let Some(exam_date) = request.exam_date {
        current.exam_date = Some(exam_date);
    }
    if let Some(daily_reset_hour) = reset_hour {
        current.daily_reset_hour = daily_reset_hour;
    }

    state
        .store
        .upsert_study_settings(auth.user_id, &current)
        .await?;

    tracing::info!(user_id = %auth.user_id, cram_mode = current.cram_mode, "study settings updated");

    Ok(Json(current))
}
