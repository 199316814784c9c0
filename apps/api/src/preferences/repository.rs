use sqlx::{PgPool, Result};
use tracing::info;
use uuid::Uuid;

use crate::models::preference::UserPreferenceRow;
use crate::preferences::{NewPreference, PreferenceUpdate};

pub async fn find_preference(pool: &PgPool, user_id: &str) -> Result<Option<UserPreferenceRow>> {
    Ok(sqlx::query_as::<_, UserPreferenceRow>(
        "SELECT * FROM user_preferences WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Returns `None` when the user already has a preference; the unique
/// constraint on `user_id` settles concurrent creates.
pub async fn insert_preference(
    pool: &PgPool,
    new: &NewPreference,
) -> Result<Option<UserPreferenceRow>> {
    let row = sqlx::query_as::<_, UserPreferenceRow>(
        r#"
        INSERT INTO user_preferences
            (id, user_id, loan_type, loan_amount, tenure, preferred_banks,
             max_interest_rate, employment_type, annual_income, credit_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id.trim())
    .bind(new.loan_type.trim())
    .bind(new.loan_amount)
    .bind(new.tenure)
    .bind(&new.preferred_banks)
    .bind(new.max_interest_rate)
    .bind(&new.employment_type)
    .bind(new.annual_income)
    .bind(new.credit_score)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = &row {
        info!("Created preferences for user {}", row.user_id);
    }
    Ok(row)
}

/// Applies only the fields present in `update`. `None` when the user has no
/// preference yet.
pub async fn update_preference(
    pool: &PgPool,
    user_id: &str,
    update: &PreferenceUpdate,
) -> Result<Option<UserPreferenceRow>> {
    Ok(sqlx::query_as::<_, UserPreferenceRow>(
        r#"
        UPDATE user_preferences SET
            loan_type         = COALESCE($2, loan_type),
            loan_amount       = COALESCE($3, loan_amount),
            tenure            = COALESCE($4, tenure),
            preferred_banks   = COALESCE($5, preferred_banks),
            max_interest_rate = COALESCE($6, max_interest_rate),
            employment_type   = COALESCE($7, employment_type),
            annual_income     = COALESCE($8, annual_income),
            credit_score      = COALESCE($9, credit_score),
            updated_at        = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(update.loan_type.as_deref().map(str::trim))
    .bind(update.loan_amount)
    .bind(update.tenure)
    .bind(&update.preferred_banks)
    .bind(update.max_interest_rate)
    .bind(&update.employment_type)
    .bind(update.annual_income)
    .bind(update.credit_score)
    .fetch_optional(pool)
    .await?)
}
