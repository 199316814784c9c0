use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A structured bank loan product, as served to comparison pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BankLoanRow {
    pub id: Uuid,
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    /// Months.
    pub min_tenure: i32,
    pub max_tenure: i32,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    pub processing_fee: String,
    pub eligibility_criteria: Vec<String>,
    pub required_documents: Vec<String>,
    pub benefits: Vec<String>,
    pub special_features: Vec<String>,
    pub source_url: Option<String>,
    pub original_data_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl BankLoanRow {
    pub fn admits_amount(&self, amount: f64) -> bool {
        self.min_loan_amount <= amount && amount <= self.max_loan_amount
    }

    pub fn admits_tenure(&self, months: i32) -> bool {
        self.min_tenure <= months && months <= self.max_tenure
    }
}

/// Scraped loan data waiting to be structured into a `BankLoanRow`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RawLoanDataRow {
    pub id: Uuid,
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    pub min_tenure: i32,
    pub max_tenure: i32,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    pub processing_fee: String,
    pub eligibility_criteria: Vec<String>,
    pub documents: Vec<String>,
    pub source_url: String,
    pub processed: bool,
    pub raw_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
