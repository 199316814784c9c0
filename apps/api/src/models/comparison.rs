use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One saved comparison: the profile as scored, the score, and the
/// eligibility shown to the user at the time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComparisonRow {
    pub id: Uuid,
    pub user_id: String,
    pub profile: Value,
    pub credit_score: i32,
    pub breakdown: Value,
    pub eligibility: Value,
    pub loan_category: Option<String>,
    pub desired_loan_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
}
