//! Loan applications against catalog products.

pub mod advice;
pub mod handlers;
pub mod prompts;
pub mod repository;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::applications::advice::AdvisoryGenerator;
use crate::errors::AppError;
use crate::models::application::ApplicationRow;

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub user_id: String,
    pub loan_id: Uuid,
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    pub requested_amount: f64,
    /// Months.
    pub requested_tenure: i32,
    #[serde(default)]
    pub application_notes: String,
}

impl NewApplication {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("user_id", &self.user_id),
            ("bank_name", &self.bank_name),
            ("loan_type", &self.loan_type),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} is required"));
            }
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err("interest_rate cannot be negative".to_string());
        }
        if !self.requested_amount.is_finite() || self.requested_amount <= 0.0 {
            return Err("requested_amount must be greater than zero".to_string());
        }
        if self.requested_tenure <= 0 {
            return Err("requested_tenure must be at least one month".to_string());
        }
        Ok(())
    }
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(&self, new: &NewApplication) -> Result<ApplicationRow, AppError>;
    async fn set_advice(&self, id: Uuid, advice: &str) -> Result<ApplicationRow, AppError>;
}

/// Validates and stores the application as pending, then attaches advice.
/// The application is stored before advice is asked for, so an advisor
/// failure leaves it in place with empty advice.
pub async fn submit_application(
    store: &dyn ApplicationStore,
    advisor: &dyn AdvisoryGenerator,
    new: &NewApplication,
) -> Result<ApplicationRow, AppError> {
    new.validate().map_err(AppError::Validation)?;
    let application = store.insert(new).await?;

    match advisor.advise(&application).await {
        Ok(advice) => store.set_advice(application.id, &advice).await,
        Err(e) => {
            warn!("No advice generated for application {}: {e}", application.id);
            Ok(application)
        }
    }
}
