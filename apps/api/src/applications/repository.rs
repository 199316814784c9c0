use async_trait::async_trait;
use sqlx::{PgPool, Result};
use tracing::info;
use uuid::Uuid;

use crate::applications::{ApplicationStore, NewApplication};
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};

pub async fn insert_application(pool: &PgPool, new: &NewApplication) -> Result<ApplicationRow> {
    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, user_id, loan_id, bank_name, loan_type, interest_rate,
             requested_amount, requested_tenure, status, application_notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id.trim())
    .bind(new.loan_id)
    .bind(new.bank_name.trim())
    .bind(new.loan_type.trim())
    .bind(new.interest_rate)
    .bind(new.requested_amount)
    .bind(new.requested_tenure)
    .bind(ApplicationStatus::Pending.as_str())
    .bind(&new.application_notes)
    .fetch_one(pool)
    .await?;

    info!(
        "Application {} submitted by {} for {} / {}",
        row.id, row.user_id, row.bank_name, row.loan_type
    );
    Ok(row)
}

pub async fn set_advice(pool: &PgPool, id: Uuid, advice: &str) -> Result<ApplicationRow> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET ai_advice = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(advice)
    .fetch_one(pool)
    .await?)
}

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<ApplicationRow>> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// `None` when no application has this id.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<ApplicationRow>> {
    let row = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    if let Some(row) = &row {
        info!("Application {} is now {}", row.id, row.status);
    }
    Ok(row)
}

pub struct PgApplicationStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgApplicationStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<'a> ApplicationStore for PgApplicationStore<'a> {
    async fn insert(&self, new: &NewApplication) -> std::result::Result<ApplicationRow, AppError> {
        Ok(insert_application(self.pool, new).await?)
    }

    async fn set_advice(
        &self,
        id: Uuid,
        advice: &str,
    ) -> std::result::Result<ApplicationRow, AppError> {
        Ok(set_advice(self.pool, id, advice).await?)
    }
}
