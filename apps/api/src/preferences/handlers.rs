use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::preference::UserPreferenceRow;
use crate::preferences::repository::{find_preference, insert_preference, update_preference};
use crate::preferences::{NewPreference, PreferenceUpdate};
use crate::state::AppState;

/// GET /api/v1/users/preferences/:user_id
pub async fn handle_get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPreferenceRow>, AppError> {
    let preference = find_preference(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No preferences saved for user {user_id}")))?;
    Ok(Json(preference))
}

/// POST /api/v1/users/preferences
pub async fn handle_create_preferences(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<UserPreferenceRow>), AppError> {
    // Missing fields are a 400 here, not the extractor's 422.
    let new: NewPreference =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    new.validate().map_err(AppError::Validation)?;
    let created = insert_preference(&state.db, &new).await?.ok_or_else(|| {
        AppError::Conflict(format!(
            "Preferences already exist for user {}",
            new.user_id.trim()
        ))
    })?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/users/preferences/:user_id
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<UserPreferenceRow>, AppError> {
    update.validate().map_err(AppError::Validation)?;
    let updated = update_preference(&state.db, &user_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No preferences saved for user {user_id}")))?;
    Ok(Json(updated))
}
