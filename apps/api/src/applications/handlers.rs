use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::applications::repository::{list_for_user, update_status, PgApplicationStore};
use crate::applications::{submit_application, NewApplication};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub message: String,
    pub data: ApplicationRow,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub count: usize,
    pub data: Vec<ApplicationRow>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let new: NewApplication =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let store = PgApplicationStore::new(&state.db);
    let application = submit_application(&store, state.advisor.as_ref(), &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Application submitted successfully".to_string(),
            data: application,
        }),
    ))
}

/// GET /api/v1/applications/user/:user_id
pub async fn handle_user_applications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let data = list_for_user(&state.db, &user_id).await?;
    Ok(Json(ApplicationListResponse {
        count: data.len(),
        data,
    }))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let status: ApplicationStatus = req.status.trim().parse().map_err(AppError::Validation)?;
    let updated = update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    Ok(Json(updated))
}
