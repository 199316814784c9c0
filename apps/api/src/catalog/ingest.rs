//! Raw scraped loan data in, structured catalog products out.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::cache::CatalogCache;
use crate::catalog::prompts::{STRUCTURE_LOAN_PROMPT, STRUCTURE_LOAN_SYSTEM};
use crate::catalog::repository::{
    insert_structured_from_raw, list_unprocessed_raw, NewBankLoan, NewRawLoanData,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTED_FIGURES};
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::bank::RawLoanDataRow;

/// Range and sign checks shared by raw entries and structured products.
fn check_ranges(
    label: &str,
    interest_rate: f64,
    tenure: (i32, i32),
    amount: (f64, f64),
) -> Result<(), String> {
    if !interest_rate.is_finite() || interest_rate < 0.0 {
        return Err(format!("{label}: interest rate must be a non-negative number"));
    }
    if tenure.0 < 0 || tenure.0 > tenure.1 {
        return Err(format!(
            "{label}: tenure range {}-{} is invalid",
            tenure.0, tenure.1
        ));
    }
    if !amount.0.is_finite() || !amount.1.is_finite() || amount.0 < 0.0 || amount.0 > amount.1 {
        return Err(format!(
            "{label}: loan amount range {}-{} is invalid",
            amount.0, amount.1
        ));
    }
    Ok(())
}

pub fn validate_raw_entry(index: usize, entry: &NewRawLoanData) -> Result<(), String> {
    let label = format!("entry {index}");
    if entry.bank_name.trim().is_empty() {
        return Err(format!("{label}: bankName is required"));
    }
    if entry.loan_type.trim().is_empty() {
        return Err(format!("{label}: loanType is required"));
    }
    if entry.source_url.trim().is_empty() {
        return Err(format!("{label}: sourceUrl is required"));
    }
    check_ranges(
        &label,
        entry.interest_rate,
        (entry.min_tenure, entry.max_tenure),
        (entry.min_loan_amount, entry.max_loan_amount),
    )
}

pub fn validate_structured(loan: &NewBankLoan) -> Result<(), String> {
    if loan.bank_name.trim().is_empty() || loan.loan_type.trim().is_empty() {
        return Err("structured loan is missing bankName or loanType".to_string());
    }
    check_ranges(
        &loan.bank_name,
        loan.interest_rate,
        (loan.min_tenure, loan.max_tenure),
        (loan.min_loan_amount, loan.max_loan_amount),
    )
}

#[derive(Debug, Serialize)]
pub struct ItemResult {
    pub raw_data_id: Uuid,
    pub bank_loan_id: Option<Uuid>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub message: String,
    pub results: Vec<ItemResult>,
}

/// Where raw rows come from and structured products go.
#[async_trait]
pub trait IngestStore: Send + Sync {
    async fn pending(&self) -> Result<Vec<RawLoanDataRow>, AppError>;
    /// Inserts the product and marks `raw_id` processed as one unit.
    async fn store(&self, raw_id: Uuid, loan: &NewBankLoan) -> Result<Uuid, AppError>;
}

pub struct PgIngestStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgIngestStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> IngestStore for PgIngestStore<'a> {
    async fn pending(&self) -> Result<Vec<RawLoanDataRow>, AppError> {
        Ok(list_unprocessed_raw(self.pool).await?)
    }

    async fn store(&self, raw_id: Uuid, loan: &NewBankLoan) -> Result<Uuid, AppError> {
        Ok(insert_structured_from_raw(self.pool, loan, raw_id).await?.id)
    }
}

/// Turns one scraped row into a product description.
#[async_trait]
pub trait LoanStructurer: Send + Sync {
    async fn structure(&self, raw: &RawLoanDataRow) -> Result<NewBankLoan, AppError>;
}

#[async_trait]
impl LoanStructurer for LlmClient {
    async fn structure(&self, raw: &RawLoanDataRow) -> Result<NewBankLoan, AppError> {
        let json = serde_json::to_string_pretty(raw).map_err(anyhow::Error::from)?;
        let prompt = STRUCTURE_LOAN_PROMPT.replace("{raw_data}", &json);
        let system = format!("{STRUCTURE_LOAN_SYSTEM} {NO_INVENTED_FIGURES} {JSON_ONLY_SYSTEM}");
        Ok(self
            .call_json(&prompt, &system, CallOptions::EXTRACTION)
            .await?)
    }
}

/// Structures every unprocessed raw entry. One bad entry never stops the
/// rest; it is reported and left unprocessed for the next run.
pub async fn generate_bank_models(
    store: &dyn IngestStore,
    structurer: &dyn LoanStructurer,
    cache: &dyn CatalogCache,
) -> Result<GenerateReport, AppError> {
    let pending = store.pending().await?;
    if pending.is_empty() {
        return Ok(GenerateReport {
            message: "No new raw data to process".to_string(),
            results: vec![],
        });
    }

    let mut results = Vec::with_capacity(pending.len());
    for item in &pending {
        match structure_one(store, structurer, item).await {
            Ok(bank_loan_id) => results.push(ItemResult {
                raw_data_id: item.id,
                bank_loan_id: Some(bank_loan_id),
                success: true,
                error: None,
            }),
            Err(e) => {
                warn!("Failed to structure raw loan data {}: {e}", item.id);
                results.push(ItemResult {
                    raw_data_id: item.id,
                    bank_loan_id: None,
                    success: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let inserted = results.iter().filter(|r| r.success).count();
    if inserted > 0 {
        cache.flush().await;
    }
    info!("Structured {inserted}/{} raw loan entries", results.len());

    Ok(GenerateReport {
        message: format!("Processed {} raw data items", results.len()),
        results,
    })
}

async fn structure_one(
    store: &dyn IngestStore,
    structurer: &dyn LoanStructurer,
    item: &RawLoanDataRow,
) -> Result<Uuid, AppError> {
    let mut structured = structurer.structure(item).await?;
    if structured.source_url.is_none() {
        structured.source_url = Some(item.source_url.clone());
    }
    validate_structured(&structured).map_err(AppError::Validation)?;
    store.store(item.id, &structured).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::cache::{all_banks_key, MemoryCatalogCache};
    use chrono::Utc;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    struct FakeStore {
        pending: Vec<RawLoanDataRow>,
        fail_for: Option<Uuid>,
        stored: Mutex<Vec<(Uuid, NewBankLoan)>>,
    }

    impl FakeStore {
        fn new(pending: Vec<RawLoanDataRow>) -> Self {
            Self {
                pending,
                fail_for: None,
                stored: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl IngestStore for FakeStore {
        async fn pending(&self) -> Result<Vec<RawLoanDataRow>, AppError> {
            Ok(self.pending.clone())
        }

        async fn store(&self, raw_id: Uuid, loan: &NewBankLoan) -> Result<Uuid, AppError> {
            if self.fail_for == Some(raw_id) {
                return Err(sqlx::Error::PoolTimedOut.into());
            }
            self.stored.lock().push((raw_id, loan.clone()));
            Ok(Uuid::new_v4())
        }
    }

    /// Echoes the raw row back as a product; a negative raw rate stays negative.
    struct EchoStructurer;

    #[async_trait]
    impl LoanStructurer for EchoStructurer {
        async fn structure(&self, raw: &RawLoanDataRow) -> Result<NewBankLoan, AppError> {
            Ok(NewBankLoan {
                bank_name: raw.bank_name.clone(),
                loan_type: raw.loan_type.clone(),
                interest_rate: raw.interest_rate,
                min_tenure: raw.min_tenure,
                max_tenure: raw.max_tenure,
                min_loan_amount: raw.min_loan_amount,
                max_loan_amount: raw.max_loan_amount,
                processing_fee: raw.processing_fee.clone(),
                eligibility_criteria: raw.eligibility_criteria.clone(),
                required_documents: raw.documents.clone(),
                benefits: vec![],
                special_features: vec![],
                source_url: None,
            })
        }
    }

    fn raw_row(bank: &str, rate: f64) -> RawLoanDataRow {
        RawLoanDataRow {
            id: Uuid::new_v4(),
            bank_name: bank.to_string(),
            loan_type: "Gold Loan".to_string(),
            interest_rate: rate,
            min_tenure: 3,
            max_tenure: 36,
            min_loan_amount: 10_000.0,
            max_loan_amount: 500_000.0,
            processing_fee: "1%".to_string(),
            eligibility_criteria: vec![],
            documents: vec![],
            source_url: format!("https://example.com/{bank}"),
            processed: false,
            raw_data: json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn warm_cache() -> MemoryCatalogCache {
        let cache = MemoryCatalogCache::new(Duration::from_secs(60), 8);
        cache.set(&all_banks_key(), "[]".to_string()).await;
        cache
    }

    #[tokio::test]
    async fn test_generate_stores_each_row_and_flushes_cache() {
        let store = FakeStore::new(vec![raw_row("Muthoot", 9.0), raw_row("Manappuram", 9.5)]);
        let cache = warm_cache().await;

        let report = generate_bank_models(&store, &EchoStructurer, &cache)
            .await
            .unwrap();

        assert!(report.results.iter().all(|r| r.success));
        assert_eq!(store.stored.lock().len(), 2);
        assert_eq!(cache.get(&all_banks_key()).await, None);
    }

    #[tokio::test]
    async fn test_generate_fills_source_url_from_raw_row() {
        let store = FakeStore::new(vec![raw_row("Muthoot", 9.0)]);
        let cache = warm_cache().await;

        generate_bank_models(&store, &EchoStructurer, &cache)
            .await
            .unwrap();

        let stored = store.stored.lock();
        assert_eq!(
            stored[0].1.source_url.as_deref(),
            Some("https://example.com/Muthoot")
        );
    }

    #[tokio::test]
    async fn test_failed_store_is_reported_and_cache_kept() {
        let row = raw_row("Muthoot", 9.0);
        let mut store = FakeStore::new(vec![row.clone()]);
        store.fail_for = Some(row.id);
        let cache = warm_cache().await;

        let report = generate_bank_models(&store, &EchoStructurer, &cache)
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert!(!report.results[0].success);
        assert_eq!(report.results[0].bank_loan_id, None);
        assert!(store.stored.lock().is_empty());
        assert!(cache.get(&all_banks_key()).await.is_some());
    }

    #[tokio::test]
    async fn test_invalid_structured_loan_never_stored() {
        let store = FakeStore::new(vec![raw_row("Bad", -2.0), raw_row("Good", 8.0)]);
        let cache = warm_cache().await;

        let report = generate_bank_models(&store, &EchoStructurer, &cache)
            .await
            .unwrap();

        let outcomes: Vec<bool> = report.results.iter().map(|r| r.success).collect();
        assert_eq!(outcomes, vec![false, true]);
        let stored = store.stored.lock();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].1.bank_name, "Good");
    }

    #[tokio::test]
    async fn test_nothing_pending() {
        let store = FakeStore::new(vec![]);
        let cache = warm_cache().await;
        let report = generate_bank_models(&store, &EchoStructurer, &cache)
            .await
            .unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.message, "No new raw data to process");
    }

    fn raw(value: serde_json::Value) -> NewRawLoanData {
        serde_json::from_value(value).unwrap()
    }

    fn valid_raw() -> serde_json::Value {
        json!({
            "bankName": "HDFC Bank",
            "loanType": "Home Loan",
            "interestRate": 8.5,
            "minTenure": 12,
            "maxTenure": 360,
            "minLoanAmount": 500000,
            "maxLoanAmount": 10000000,
            "sourceUrl": "https://example.com/home-loan"
        })
    }

    #[test]
    fn test_raw_defaults_applied() {
        let entry = raw(valid_raw());
        assert_eq!(entry.processing_fee, "Not specified");
        assert!(entry.documents.is_empty());
        assert!(validate_raw_entry(0, &entry).is_ok());
    }

    #[test]
    fn test_raw_rejects_inverted_amounts() {
        let mut value = valid_raw();
        value["minLoanAmount"] = json!(20_000_000);
        let err = validate_raw_entry(3, &raw(value)).unwrap_err();
        assert!(err.starts_with("entry 3"), "{err}");
    }

    #[test]
    fn test_raw_rejects_blank_bank() {
        let mut value = valid_raw();
        value["bankName"] = json!("  ");
        assert!(validate_raw_entry(0, &raw(value)).is_err());
    }

    #[test]
    fn test_structured_from_llm_json() {
        let loan: NewBankLoan = serde_json::from_value(json!({
            "bankName": "SBI",
            "loanType": "Car Loan",
            "interestRate": 9.25,
            "minTenure": 12,
            "maxTenure": 84,
            "minLoanAmount": 100000,
            "maxLoanAmount": 10000000,
            "requiredDocuments": ["ID Proof"]
        }))
        .unwrap();
        assert!(validate_structured(&loan).is_ok());
        assert_eq!(loan.required_documents, vec!["ID Proof".to_string()]);
        assert_eq!(loan.source_url, None);
    }

    #[test]
    fn test_structured_rejects_negative_rate() {
        let loan: NewBankLoan = serde_json::from_value(json!({
            "bankName": "SBI",
            "loanType": "Car Loan",
            "interestRate": -1.0,
            "minTenure": 12,
            "maxTenure": 84,
            "minLoanAmount": 1,
            "maxLoanAmount": 2
        }))
        .unwrap();
        assert!(validate_structured(&loan).is_err());
    }
}
