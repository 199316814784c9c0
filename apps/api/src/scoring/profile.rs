use serde::{Deserialize, Serialize};

use super::number_format::{parse_formatted_integer, parse_formatted_number};
use super::ScoringError;

// ────────────────────────────────────────────────────────────────────────────
// Typed profile (engine input)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    Salaried,
    #[serde(rename = "Self-Employed")]
    SelfEmployed,
    Unemployed,
}

impl EmploymentType {
    pub fn parse(value: &str) -> Result<Self, ScoringError> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "salaried" => Ok(Self::Salaried),
            "selfemployed" => Ok(Self::SelfEmployed),
            "unemployed" => Ok(Self::Unemployed),
            "" => Err(ScoringError::InvalidProfile(
                "employmentType is required".to_string(),
            )),
            _ => Err(ScoringError::InvalidProfile(format!(
                "unknown employmentType '{}'",
                value.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousLoan {
    pub loan_amount: f64,
    pub emi_amount: f64,
    /// Years since the loan was taken.
    pub loan_age: u32,
    /// Informational only; never enters score math.
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub annual_income: f64,
    pub employment_type: EmploymentType,
    pub years_in_current_job: u32,
    pub age: u32,
    pub has_previous_loans: bool,
    pub previous_loans: Vec<PreviousLoan>,
    pub loan_rejection_history: bool,
    /// Monthly average.
    pub avg_credit_card_usage: f64,
}

impl ApplicantProfile {
    /// Checks the invariants the scorer relies on. Contradictory previous-loan
    /// data is rejected instead of guessed at.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.annual_income.is_finite() || self.annual_income <= 0.0 {
            return Err(ScoringError::InvalidProfile(
                "annualIncome must be greater than zero".to_string(),
            ));
        }
        if !self.avg_credit_card_usage.is_finite() || self.avg_credit_card_usage < 0.0 {
            return Err(ScoringError::InvalidProfile(
                "avgCreditCardUsage cannot be negative".to_string(),
            ));
        }
        if self.has_previous_loans && self.previous_loans.is_empty() {
            return Err(ScoringError::InvalidProfile(
                "hasPreviousLoans is Yes but no previous loans were given".to_string(),
            ));
        }
        if !self.has_previous_loans && !self.previous_loans.is_empty() {
            return Err(ScoringError::InvalidProfile(
                "previous loans were given but hasPreviousLoans is No".to_string(),
            ));
        }
        for (i, loan) in self.previous_loans.iter().enumerate() {
            if !loan.loan_amount.is_finite() || loan.loan_amount < 0.0 {
                return Err(ScoringError::InvalidProfile(format!(
                    "previousLoans[{i}].loanAmount cannot be negative"
                )));
            }
            if !loan.emi_amount.is_finite() || loan.emi_amount < 0.0 {
                return Err(ScoringError::InvalidProfile(format!(
                    "previousLoans[{i}].emiAmount cannot be negative"
                )));
            }
        }
        Ok(())
    }

    pub fn total_previous_loan_amount(&self) -> f64 {
        self.previous_loans.iter().map(|l| l.loan_amount).sum()
    }

    /// Age in years of the oldest previous loan, 0 with no history.
    pub fn oldest_loan_age(&self) -> u32 {
        self.previous_loans
            .iter()
            .map(|l| l.loan_age)
            .max()
            .unwrap_or(0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire form (what the comparison pages post)
// ────────────────────────────────────────────────────────────────────────────

/// A numeric form field: either a JSON number or the formatted text the
/// user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl FormNumber {
    fn to_f64(&self, field: &str) -> Result<f64, ScoringError> {
        match self {
            FormNumber::Number(n) if n.is_finite() => Ok(*n),
            FormNumber::Number(n) => Err(ScoringError::parse(field, &n.to_string())),
            FormNumber::Text(s) => parse_formatted_number(field, s),
        }
    }

    fn to_u32(&self, field: &str) -> Result<u32, ScoringError> {
        match self {
            FormNumber::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Ok(*n as u32)
            }
            FormNumber::Number(n) => Err(ScoringError::parse(field, &n.to_string())),
            FormNumber::Text(s) => parse_formatted_integer(field, s),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, FormNumber::Text(s) if s.trim().is_empty())
    }
}

/// A yes/no form field: `"Yes"`/`"No"` from a select, or a JSON boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormFlag {
    Bool(bool),
    Text(String),
}

impl FormFlag {
    fn to_bool(&self, field: &str) -> Result<bool, ScoringError> {
        match self {
            FormFlag::Bool(b) => Ok(*b),
            FormFlag::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                "" => Err(ScoringError::InvalidProfile(format!("{field} is required"))),
                _ => Err(ScoringError::InvalidProfile(format!(
                    "{field} must be Yes or No, got '{}'",
                    s.trim()
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousLoanForm {
    pub loan_amount: FormNumber,
    pub emi_amount: FormNumber,
    pub loan_age: FormNumber,
    #[serde(default)]
    pub interest_rate: Option<FormNumber>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantForm {
    pub annual_income: FormNumber,
    pub employment_type: String,
    pub years_in_current_job: FormNumber,
    pub age: FormNumber,
    pub has_previous_loans: FormFlag,
    #[serde(default)]
    pub previous_loans: Vec<PreviousLoanForm>,
    pub loan_rejection_history: FormFlag,
    pub avg_credit_card_usage: FormNumber,
}

impl TryFrom<&PreviousLoanForm> for PreviousLoan {
    type Error = ScoringError;

    fn try_from(form: &PreviousLoanForm) -> Result<Self, Self::Error> {
        let interest_rate = match &form.interest_rate {
            Some(rate) if !rate.is_blank() => Some(rate.to_f64("interestRate")?),
            _ => None,
        };
        Ok(PreviousLoan {
            loan_amount: form.loan_amount.to_f64("loanAmount")?,
            emi_amount: form.emi_amount.to_f64("emiAmount")?,
            loan_age: form.loan_age.to_u32("loanAge")?,
            interest_rate,
        })
    }
}

impl TryFrom<&ApplicantForm> for ApplicantProfile {
    type Error = ScoringError;

    fn try_from(form: &ApplicantForm) -> Result<Self, Self::Error> {
        let previous_loans = form
            .previous_loans
            .iter()
            .map(PreviousLoan::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let profile = ApplicantProfile {
            annual_income: form.annual_income.to_f64("annualIncome")?,
            employment_type: EmploymentType::parse(&form.employment_type)?,
            years_in_current_job: form.years_in_current_job.to_u32("yearsInCurrentJob")?,
            age: form.age.to_u32("age")?,
            has_previous_loans: form.has_previous_loans.to_bool("hasPreviousLoans")?,
            previous_loans,
            loan_rejection_history: form
                .loan_rejection_history
                .to_bool("loanRejectionHistory")?,
            avg_credit_card_usage: form.avg_credit_card_usage.to_f64("avgCreditCardUsage")?,
        };
        profile.validate()?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_json() -> serde_json::Value {
        json!({
            "annualIncome": "12,00,000",
            "employmentType": "Self-Employed",
            "yearsInCurrentJob": "4",
            "age": 30,
            "hasPreviousLoans": "Yes",
            "previousLoans": [
                {"loanAmount": "2,00,000", "emiAmount": "5,000", "loanAge": "3", "interestRate": ""}
            ],
            "loanRejectionHistory": "No",
            "avgCreditCardUsage": "10,000"
        })
    }

    #[test]
    fn test_form_converts_formatted_strings() {
        let form: ApplicantForm = serde_json::from_value(form_json()).unwrap();
        let profile = ApplicantProfile::try_from(&form).unwrap();
        assert_eq!(profile.annual_income, 1_200_000.0);
        assert_eq!(profile.employment_type, EmploymentType::SelfEmployed);
        assert_eq!(profile.age, 30);
        assert!(profile.has_previous_loans);
        assert!(!profile.loan_rejection_history);
        assert_eq!(profile.previous_loans.len(), 1);
        assert_eq!(profile.previous_loans[0].loan_amount, 200_000.0);
        assert_eq!(profile.previous_loans[0].interest_rate, None);
        assert_eq!(profile.avg_credit_card_usage, 10_000.0);
    }

    #[test]
    fn test_form_rejects_malformed_amount() {
        let mut value = form_json();
        value["annualIncome"] = json!("twelve lakh");
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        let err = ApplicantProfile::try_from(&form).unwrap_err();
        assert!(matches!(err, ScoringError::Parse { ref field, .. } if field == "annualIncome"));
    }

    #[test]
    fn test_form_rejects_malformed_optional_rate() {
        let mut value = form_json();
        value["previousLoans"][0]["interestRate"] = json!("9.5%");
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::Parse { .. })
        ));
    }

    #[test]
    fn test_form_rejects_unknown_employment() {
        let mut value = form_json();
        value["employmentType"] = json!("Retired");
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_form_rejects_missing_flag() {
        let mut value = form_json();
        value["loanRejectionHistory"] = json!("");
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        let err = ApplicantProfile::try_from(&form).unwrap_err();
        assert_eq!(err.code(), "INVALID_PROFILE");
    }

    #[test]
    fn test_zero_income_is_invalid() {
        let mut value = form_json();
        value["annualIncome"] = json!("0");
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_yes_flag_without_loans_is_contradictory() {
        let mut value = form_json();
        value["previousLoans"] = json!([]);
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_no_flag_with_loans_is_contradictory() {
        let mut value = form_json();
        value["hasPreviousLoans"] = json!(false);
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_fractional_age_rejected() {
        let mut value = form_json();
        value["age"] = json!(30.5);
        let form: ApplicantForm = serde_json::from_value(value).unwrap();
        assert!(matches!(
            ApplicantProfile::try_from(&form),
            Err(ScoringError::Parse { .. })
        ));
    }

    #[test]
    fn test_employment_type_spellings() {
        assert_eq!(
            EmploymentType::parse("salaried").unwrap(),
            EmploymentType::Salaried
        );
        assert_eq!(
            EmploymentType::parse("SelfEmployed").unwrap(),
            EmploymentType::SelfEmployed
        );
        assert_eq!(
            EmploymentType::parse(" self employed ").unwrap(),
            EmploymentType::SelfEmployed
        );
    }

    #[test]
    fn test_oldest_loan_age() {
        let form: ApplicantForm = serde_json::from_value(form_json()).unwrap();
        let mut profile = ApplicantProfile::try_from(&form).unwrap();
        profile.previous_loans.push(PreviousLoan {
            loan_amount: 1.0,
            emi_amount: 1.0,
            loan_age: 7,
            interest_rate: Some(10.0),
        });
        assert_eq!(profile.oldest_loan_age(), 7);
        assert_eq!(profile.total_previous_loan_amount(), 200_001.0);
    }
}
