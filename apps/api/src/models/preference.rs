use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferenceRow {
    pub id: Uuid,
    pub user_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    /// Months.
    pub tenure: i32,
    pub preferred_banks: Vec<String>,
    pub max_interest_rate: Option<f64>,
    pub employment_type: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
