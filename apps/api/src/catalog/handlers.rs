use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::cache::{all_banks_key, get_json, loans_by_type_key, set_json};
use crate::catalog::emi::{rank_offers, OfferCriteria, RankedOffer};
use crate::catalog::ingest::{
    generate_bank_models, validate_raw_entry, GenerateReport, PgIngestStore,
};
use crate::catalog::loan_type::normalize_loan_type;
use crate::catalog::repository::{
    find_by_id, insert_raw_batch, list_all, list_by_type, list_matching_preference, NewRawLoanData,
};
use crate::errors::AppError;
use crate::models::bank::{BankLoanRow, RawLoanDataRow};
use crate::preferences::repository::find_preference;
use crate::state::AppState;

#[derive(Serialize)]
pub struct LoanListResponse {
    pub count: usize,
    pub data: Vec<BankLoanRow>,
}

impl From<Vec<BankLoanRow>> for LoanListResponse {
    fn from(data: Vec<BankLoanRow>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PersonalizedQuery {
    pub loan_amount: Option<f64>,
    /// Months.
    pub tenure: Option<u32>,
    // Accepted so existing clients keep working; neither narrows the list.
    #[allow(dead_code)]
    pub income: Option<f64>,
    #[allow(dead_code)]
    pub employment_type: Option<String>,
}

#[derive(Serialize)]
pub struct PersonalizedResponse {
    pub count: usize,
    pub data: Vec<RankedOffer>,
    pub message: String,
}

#[derive(Serialize)]
pub struct StoreRawResponse {
    pub message: String,
    pub data: Vec<RawLoanDataRow>,
}

/// GET /api/v1/banks
pub async fn handle_list_banks(
    State(state): State<AppState>,
) -> Result<Json<LoanListResponse>, AppError> {
    let key = all_banks_key();
    if let Some(cached) = get_json::<Vec<BankLoanRow>>(state.catalog_cache.as_ref(), &key).await {
        debug!("Returning banks from cache");
        return Ok(Json(cached.into()));
    }

    let banks = list_all(&state.db).await?;
    set_json(state.catalog_cache.as_ref(), &key, &banks).await;
    Ok(Json(banks.into()))
}

/// GET /api/v1/banks/:id
pub async fn handle_get_bank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BankLoanRow>, AppError> {
    let bank = find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bank loan {id} not found")))?;
    Ok(Json(bank))
}

/// GET /api/v1/banks/type/:loan_type
pub async fn handle_loans_by_type(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LoanListResponse>, AppError> {
    let loan_type = normalize_loan_type(&slug);
    if loan_type.is_empty() {
        return Err(AppError::Validation("loan type cannot be empty".to_string()));
    }

    let key = loans_by_type_key(&loan_type.to_lowercase().replace(' ', "_"));
    if let Some(cached) = get_json::<Vec<BankLoanRow>>(state.catalog_cache.as_ref(), &key).await {
        debug!("Returning {loan_type} loans from cache");
        return Ok(Json(cached.into()));
    }

    let loans = list_by_type(&state.db, &loan_type).await?;
    info!("Found {} loans of type {loan_type}", loans.len());
    set_json(state.catalog_cache.as_ref(), &key, &loans).await;
    Ok(Json(loans.into()))
}

/// GET /api/v1/banks/filter/:user_id
pub async fn handle_filter_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LoanListResponse>, AppError> {
    let preference = find_preference(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No preferences saved for user {user_id}")))?;
    let loans = list_matching_preference(&state.db, &preference).await?;
    Ok(Json(loans.into()))
}

/// GET /api/v1/banks/personalized
pub async fn handle_personalized(
    State(state): State<AppState>,
    Query(query): Query<PersonalizedQuery>,
) -> Result<Json<PersonalizedResponse>, AppError> {
    if query.loan_amount.map_or(false, |a| !a.is_finite() || a <= 0.0) {
        return Err(AppError::Validation(
            "loan_amount must be greater than zero".to_string(),
        ));
    }
    if query.tenure == Some(0) {
        return Err(AppError::Validation(
            "tenure must be at least one month".to_string(),
        ));
    }

    let banks = match get_json::<Vec<BankLoanRow>>(state.catalog_cache.as_ref(), &all_banks_key()).await {
        Some(cached) => cached,
        None => list_all(&state.db).await?,
    };
    let data = rank_offers(
        banks,
        OfferCriteria {
            loan_amount: query.loan_amount,
            tenure: query.tenure,
        },
    );

    Ok(Json(PersonalizedResponse {
        count: data.len(),
        data,
        message: "Personalized recommendations based on your criteria".to_string(),
    }))
}

/// POST /api/v1/banks/raw
pub async fn handle_store_raw(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<StoreRawResponse>), AppError> {
    let Value::Array(items) = body else {
        return Err(AppError::Validation(
            "Expected an array of loan data".to_string(),
        ));
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let entry: NewRawLoanData = serde_json::from_value(item)
            .map_err(|e| AppError::Validation(format!("entry {index}: {e}")))?;
        validate_raw_entry(index, &entry).map_err(AppError::Validation)?;
        entries.push(entry);
    }

    let stored = insert_raw_batch(&state.db, &entries).await?;
    Ok((
        StatusCode::CREATED,
        Json(StoreRawResponse {
            message: format!("Successfully stored {} loan data entries", stored.len()),
            data: stored,
        }),
    ))
}

/// POST /api/v1/banks/generate-models
pub async fn handle_generate_models(
    State(state): State<AppState>,
) -> Result<Json<GenerateReport>, AppError> {
    let store = PgIngestStore::new(&state.db);
    let report = generate_bank_models(&store, &state.llm, state.catalog_cache.as_ref()).await?;
    Ok(Json(report))
}
