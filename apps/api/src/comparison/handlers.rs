use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::repository::list_by_type;
use crate::comparison::repository::{insert_comparison, list_for_user, NewComparison};
use crate::comparison::{build_comparison, ComparisonOutcome};
use crate::errors::AppError;
use crate::models::comparison::ComparisonRow;
use crate::scoring::eligibility::LoanCategory;
use crate::scoring::handlers::read_profile_body;
use crate::scoring::profile::{ApplicantForm, ApplicantProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub profile: ApplicantForm,
    #[serde(default)]
    pub loan_category: Option<String>,
    #[serde(default)]
    pub desired_loan_amount: Option<f64>,
}

#[derive(Serialize)]
pub struct ComparisonResponse {
    /// Set when the comparison was saved to the user's history.
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub outcome: ComparisonOutcome,
}

#[derive(Serialize)]
pub struct ComparisonHistoryResponse {
    pub count: usize,
    pub data: Vec<ComparisonRow>,
}

/// POST /api/v1/comparisons
pub async fn handle_create_comparison(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let req: ComparisonRequest = read_profile_body(body)?;
    let profile = ApplicantProfile::try_from(&req.profile)?;
    let category = req
        .loan_category
        .as_deref()
        .map(str::parse::<LoanCategory>)
        .transpose()?;

    let catalog = match category {
        Some(category) => list_by_type(&state.db, category.catalog_loan_type()).await?,
        None => vec![],
    };
    let outcome = build_comparison(&profile, category, req.desired_loan_amount, catalog)?;

    let id = match req.user_id.as_deref().map(str::trim) {
        Some(user_id) if !user_id.is_empty() => {
            let to_json = |v: serde_json::Result<serde_json::Value>| v.map_err(anyhow::Error::from);
            let row = insert_comparison(
                &state.db,
                NewComparison {
                    user_id,
                    profile: to_json(serde_json::to_value(&profile))?,
                    credit_score: i32::from(outcome.report.score.value()),
                    breakdown: to_json(serde_json::to_value(&outcome.report.breakdown))?,
                    eligibility: to_json(serde_json::to_value(&outcome.eligibility))?,
                    loan_category: category.map(LoanCategory::as_str),
                    desired_loan_amount: req.desired_loan_amount,
                },
            )
            .await?;
            Some(row.id)
        }
        _ => None,
    };

    Ok(Json(ComparisonResponse { id, outcome }))
}

/// GET /api/v1/comparisons/user/:user_id
pub async fn handle_comparison_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ComparisonHistoryResponse>, AppError> {
    let data = list_for_user(&state.db, &user_id).await?;
    Ok(Json(ComparisonHistoryResponse {
        count: data.len(),
        data,
    }))
}
