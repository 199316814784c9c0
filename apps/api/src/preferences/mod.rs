//! Saved loan preferences, one record per user.

pub mod handlers;
pub mod repository;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPreference {
    pub user_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
    /// Months.
    pub tenure: i32,
    #[serde(default)]
    pub preferred_banks: Vec<String>,
    #[serde(default)]
    pub max_interest_rate: Option<f64>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub credit_score: Option<i32>,
}

/// Fields a `PUT` may change. `user_id` is not among them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceUpdate {
    pub loan_type: Option<String>,
    pub loan_amount: Option<f64>,
    pub tenure: Option<i32>,
    pub preferred_banks: Option<Vec<String>>,
    pub max_interest_rate: Option<f64>,
    pub employment_type: Option<String>,
    pub annual_income: Option<f64>,
    pub credit_score: Option<i32>,
}

fn check_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("loan_amount must be greater than zero".to_string());
    }
    Ok(())
}

fn check_tenure(tenure: i32) -> Result<(), String> {
    if tenure <= 0 {
        return Err("tenure must be at least one month".to_string());
    }
    Ok(())
}

fn check_optional(
    max_interest_rate: Option<f64>,
    annual_income: Option<f64>,
    credit_score: Option<i32>,
) -> Result<(), String> {
    if max_interest_rate.map_or(false, |r| !r.is_finite() || r < 0.0) {
        return Err("max_interest_rate cannot be negative".to_string());
    }
    if annual_income.map_or(false, |i| !i.is_finite() || i < 0.0) {
        return Err("annual_income cannot be negative".to_string());
    }
    if credit_score.map_or(false, |s| !(300..=900).contains(&s)) {
        return Err("credit_score must be between 300 and 900".to_string());
    }
    Ok(())
}

impl NewPreference {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("user_id is required".to_string());
        }
        if self.loan_type.trim().is_empty() {
            return Err("loan_type is required".to_string());
        }
        check_amount(self.loan_amount)?;
        check_tenure(self.tenure)?;
        check_optional(self.max_interest_rate, self.annual_income, self.credit_score)
    }
}

impl PreferenceUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.loan_type.as_deref().map_or(false, |t| t.trim().is_empty()) {
            return Err("loan_type cannot be empty".to_string());
        }
        if let Some(amount) = self.loan_amount {
            check_amount(amount)?;
        }
        if let Some(tenure) = self.tenure {
            check_tenure(tenure)?;
        }
        check_optional(self.max_interest_rate, self.annual_income, self.credit_score)
    }
}
