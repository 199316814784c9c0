use sqlx::{PgPool, Result};
use tracing::info;
use uuid::Uuid;

use crate::models::comparison::ComparisonRow;

pub struct NewComparison<'a> {
    pub user_id: &'a str,
    pub profile: serde_json::Value,
    pub credit_score: i32,
    pub breakdown: serde_json::Value,
    pub eligibility: serde_json::Value,
    pub loan_category: Option<&'a str>,
    pub desired_loan_amount: Option<f64>,
}

pub async fn insert_comparison(pool: &PgPool, new: NewComparison<'_>) -> Result<ComparisonRow> {
    let row = sqlx::query_as::<_, ComparisonRow>(
        r#"
        INSERT INTO comparisons
            (id, user_id, profile, credit_score, breakdown, eligibility,
             loan_category, desired_loan_amount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.profile)
    .bind(new.credit_score)
    .bind(&new.breakdown)
    .bind(&new.eligibility)
    .bind(new.loan_category)
    .bind(new.desired_loan_amount)
    .fetch_one(pool)
    .await?;

    info!("Saved comparison {} for user {}", row.id, row.user_id);
    Ok(row)
}

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<ComparisonRow>> {
    Ok(sqlx::query_as::<_, ComparisonRow>(
        "SELECT * FROM comparisons WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}
