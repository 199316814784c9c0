//! Axum route handlers for the scoring endpoints.

use axum::Json;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::scoring::credit_score::{
    compute_credit_report, compute_credit_score, CreditReport, CreditScore,
};
use crate::scoring::eligibility::{resolve_eligibility, LoanEligibility};
use crate::scoring::profile::{ApplicantForm, ApplicantProfile};
use crate::scoring::ScoringError;

/// Reads a body that carries an applicant form. Missing, null or mistyped
/// fields are an invalid profile, reported in the usual error envelope
/// instead of the extractor's 422.
pub(crate) fn read_profile_body<T: DeserializeOwned>(body: Value) -> Result<T, ScoringError> {
    serde_json::from_value(body).map_err(|e| ScoringError::InvalidProfile(e.to_string()))
}

/// Either an already computed score or a profile to score first.
#[derive(Debug, Deserialize)]
pub struct EligibilityRequest {
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub profile: Option<ApplicantForm>,
    pub category: String,
}

impl EligibilityRequest {
    fn score(&self) -> Result<CreditScore, ScoringError> {
        match (self.score, &self.profile) {
            (Some(score), None) => CreditScore::new(score),
            (None, Some(form)) => compute_credit_score(&ApplicantProfile::try_from(form)?),
            (Some(_), Some(_)) => Err(ScoringError::InvalidProfile(
                "send either score or profile, not both".to_string(),
            )),
            (None, None) => Err(ScoringError::InvalidProfile(
                "score or profile is required".to_string(),
            )),
        }
    }
}

/// POST /api/v1/credit-score
pub async fn handle_credit_score(Json(body): Json<Value>) -> Result<Json<CreditReport>, AppError> {
    let form: ApplicantForm = read_profile_body(body)?;
    let profile = ApplicantProfile::try_from(&form)?;
    let report = compute_credit_report(&profile)?;
    debug!("Scored applicant profile: {}", report.score);
    Ok(Json(report))
}

/// POST /api/v1/eligibility
pub async fn handle_eligibility(
    Json(body): Json<Value>,
) -> Result<Json<LoanEligibility>, AppError> {
    let req: EligibilityRequest = read_profile_body(body)?;
    let score = req.score()?;
    Ok(Json(resolve_eligibility(score, &req.category)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> Value {
        json!({
            "annualIncome": "12,00,000",
            "employmentType": "Salaried",
            "yearsInCurrentJob": 4,
            "age": 30,
            "hasPreviousLoans": "No",
            "loanRejectionHistory": "No",
            "avgCreditCardUsage": "10,000"
        })
    }

    #[test]
    fn test_missing_field_is_invalid_profile() {
        let mut body = form();
        body.as_object_mut().unwrap().remove("age");
        let err = read_profile_body::<ApplicantForm>(body).unwrap_err();
        assert_eq!(err.code(), "INVALID_PROFILE");
        assert!(err.to_string().contains("age"), "{err}");
    }

    #[test]
    fn test_null_flag_is_invalid_profile() {
        let mut body = form();
        body["hasPreviousLoans"] = Value::Null;
        let err = read_profile_body::<ApplicantForm>(body).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidProfile(_)));
    }

    #[test]
    fn test_eligibility_scores_profile_when_given() {
        let req: EligibilityRequest =
            read_profile_body(json!({ "profile": form(), "category": "gold" })).unwrap();
        assert_eq!(req.score().unwrap().value(), 900);
    }

    #[test]
    fn test_eligibility_needs_exactly_one_of_score_and_profile() {
        let neither: EligibilityRequest = read_profile_body(json!({ "category": "car" })).unwrap();
        assert!(matches!(neither.score(), Err(ScoringError::InvalidProfile(_))));

        let both: EligibilityRequest =
            read_profile_body(json!({ "score": 700, "profile": form(), "category": "car" }))
                .unwrap();
        assert!(matches!(both.score(), Err(ScoringError::InvalidProfile(_))));
    }
}
