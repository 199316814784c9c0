use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool, Result};
use tracing::info;
use uuid::Uuid;

use crate::models::bank::{BankLoanRow, RawLoanDataRow};
use crate::models::preference::UserPreferenceRow;

pub async fn list_all(pool: &PgPool) -> Result<Vec<BankLoanRow>> {
    Ok(sqlx::query_as::<_, BankLoanRow>(
        "SELECT * FROM bank_loans ORDER BY bank_name, loan_type",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<BankLoanRow>> {
    Ok(
        sqlx::query_as::<_, BankLoanRow>("SELECT * FROM bank_loans WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// `loan_type` is the stored label ("Home Loan"), matched case-insensitively.
pub async fn list_by_type(pool: &PgPool, loan_type: &str) -> Result<Vec<BankLoanRow>> {
    Ok(sqlx::query_as::<_, BankLoanRow>(
        "SELECT * FROM bank_loans WHERE LOWER(loan_type) = LOWER($1) ORDER BY interest_rate ASC",
    )
    .bind(loan_type)
    .fetch_all(pool)
    .await?)
}

/// Products matching a saved preference: same type, rate under the ceiling
/// when one is set, amount range containing the preferred amount.
pub async fn list_matching_preference(
    pool: &PgPool,
    preference: &UserPreferenceRow,
) -> Result<Vec<BankLoanRow>> {
    Ok(sqlx::query_as::<_, BankLoanRow>(
        r#"
        SELECT * FROM bank_loans
        WHERE LOWER(loan_type) = LOWER($1)
          AND ($2::DOUBLE PRECISION IS NULL OR interest_rate <= $2)
          AND min_loan_amount <= $3
          AND max_loan_amount >= $3
        ORDER BY interest_rate ASC
        "#,
    )
    .bind(&preference.loan_type)
    .bind(preference.max_interest_rate)
    .bind(preference.loan_amount)
    .fetch_all(pool)
    .await?)
}

/// Fields of a structured product, as produced by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBankLoan {
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    pub min_tenure: i32,
    pub max_tenure: i32,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    #[serde(default = "default_processing_fee")]
    pub processing_fee: String,
    #[serde(default)]
    pub eligibility_criteria: Vec<String>,
    #[serde(default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub special_features: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

pub(crate) fn default_processing_fee() -> String {
    "Not specified".to_string()
}

/// Stores a structured product and marks its raw source processed. Both
/// happen or neither does, so a retried run never inserts the product twice.
pub async fn insert_structured_from_raw(
    pool: &PgPool,
    loan: &NewBankLoan,
    raw_id: Uuid,
) -> Result<BankLoanRow> {
    let mut tx = pool.begin().await?;
    let row = insert_bank_loan(&mut tx, loan, Some(raw_id)).await?;
    mark_raw_processed(&mut tx, raw_id).await?;
    tx.commit().await?;
    Ok(row)
}

async fn insert_bank_loan(
    conn: &mut PgConnection,
    loan: &NewBankLoan,
    original_data_id: Option<Uuid>,
) -> Result<BankLoanRow> {
    let row = sqlx::query_as::<_, BankLoanRow>(
        r#"
        INSERT INTO bank_loans
            (id, bank_name, loan_type, interest_rate, min_tenure, max_tenure,
             min_loan_amount, max_loan_amount, processing_fee, eligibility_criteria,
             required_documents, benefits, special_features, source_url, original_data_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&loan.bank_name)
    .bind(&loan.loan_type)
    .bind(loan.interest_rate)
    .bind(loan.min_tenure)
    .bind(loan.max_tenure)
    .bind(loan.min_loan_amount)
    .bind(loan.max_loan_amount)
    .bind(&loan.processing_fee)
    .bind(&loan.eligibility_criteria)
    .bind(&loan.required_documents)
    .bind(&loan.benefits)
    .bind(&loan.special_features)
    .bind(&loan.source_url)
    .bind(original_data_id)
    .fetch_one(&mut *conn)
    .await?;

    info!(
        "Inserted bank loan {} ({} / {})",
        row.id, row.bank_name, row.loan_type
    );
    Ok(row)
}

// ────────────────────────────────────────────────────────────────────────────
// Raw scraped data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRawLoanData {
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    pub min_tenure: i32,
    pub max_tenure: i32,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    #[serde(default = "default_processing_fee")]
    pub processing_fee: String,
    #[serde(default)]
    pub eligibility_criteria: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    pub source_url: String,
    #[serde(default)]
    pub raw_data: serde_json::Value,
}

/// Inserts every entry in one transaction; either all are stored or none.
pub async fn insert_raw_batch(
    pool: &PgPool,
    entries: &[NewRawLoanData],
) -> Result<Vec<RawLoanDataRow>> {
    let mut tx = pool.begin().await?;
    let mut stored = Vec::with_capacity(entries.len());

    for entry in entries {
        let raw_data = if entry.raw_data.is_null() {
            serde_json::json!({})
        } else {
            entry.raw_data.clone()
        };
        let row = sqlx::query_as::<_, RawLoanDataRow>(
            r#"
            INSERT INTO raw_loan_data
                (id, bank_name, loan_type, interest_rate, min_tenure, max_tenure,
                 min_loan_amount, max_loan_amount, processing_fee, eligibility_criteria,
                 documents, source_url, raw_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.bank_name)
        .bind(&entry.loan_type)
        .bind(entry.interest_rate)
        .bind(entry.min_tenure)
        .bind(entry.max_tenure)
        .bind(entry.min_loan_amount)
        .bind(entry.max_loan_amount)
        .bind(&entry.processing_fee)
        .bind(&entry.eligibility_criteria)
        .bind(&entry.documents)
        .bind(&entry.source_url)
        .bind(raw_data)
        .fetch_one(&mut *tx)
        .await?;
        stored.push(row);
    }

    tx.commit().await?;
    info!("Stored {} raw loan data entries", stored.len());
    Ok(stored)
}

pub async fn list_unprocessed_raw(pool: &PgPool) -> Result<Vec<RawLoanDataRow>> {
    Ok(sqlx::query_as::<_, RawLoanDataRow>(
        "SELECT * FROM raw_loan_data WHERE processed = FALSE ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?)
}

async fn mark_raw_processed(conn: &mut PgConnection, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE raw_loan_data SET processed = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
