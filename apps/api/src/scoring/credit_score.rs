//! Percentage-weighted credit score, base 300, capped at 900.
//!
//! | factor                   | share | max  |
//! |--------------------------|-------|------|
//! | utilization              | 40%   | +360 |
//! | payments & credit age    | 30%   | +270 |
//! | recent inquiries         | 10%   | +90  |
//! | employment stability     | 10%   | +90  |
//! | demographics             | 10%   | +90  |
//!
//! Rejection history is collected on the form but carries no weight here.

use serde::{Deserialize, Serialize};

use super::profile::{ApplicantProfile, EmploymentType};
use super::ScoringError;

pub const MIN_SCORE: u16 = 300;
pub const MAX_SCORE: u16 = 900;

/// A score inside [300, 900]. Only constructed by the estimator or by
/// range-checked input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct CreditScore(u16);

impl CreditScore {
    pub fn new(value: i64) -> Result<Self, ScoringError> {
        if (MIN_SCORE as i64..=MAX_SCORE as i64).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(ScoringError::ScoreOutOfRange(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn band(self) -> ScoreBand {
        match self.0 {
            750.. => ScoreBand::Excellent,
            650..=749 => ScoreBand::Good,
            550..=649 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

impl TryFrom<i64> for CreditScore {
    type Error = ScoringError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CreditScore> for u16 {
    fn from(score: CreditScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for CreditScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bands line up with the eligibility tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Points awarded per factor, before the base and the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub utilization_percent: f64,
    pub utilization: u32,
    pub payment_history: u32,
    pub credit_age: u32,
    pub recent_inquiries: u32,
    pub employment_type: u32,
    pub job_tenure: u32,
    pub demographics: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.utilization
            + self.payment_history
            + self.credit_age
            + self.recent_inquiries
            + self.employment_type
            + self.job_tenure
            + self.demographics
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub score: CreditScore,
    pub band: ScoreBand,
    pub breakdown: ScoreBreakdown,
}

/// Score only, for callers that have no use for the breakdown.
pub fn compute_credit_score(profile: &ApplicantProfile) -> Result<CreditScore, ScoringError> {
    compute_credit_report(profile).map(|report| report.score)
}

/// Scores a profile and keeps the per-factor points.
pub fn compute_credit_report(profile: &ApplicantProfile) -> Result<CreditReport, ScoringError> {
    profile.validate()?;

    let utilization_percent = utilization_percent(profile);
    let breakdown = ScoreBreakdown {
        utilization_percent,
        utilization: utilization_points(utilization_percent),
        payment_history: payment_history_points(profile.has_previous_loans),
        credit_age: credit_age_points(profile.oldest_loan_age()),
        recent_inquiries: inquiry_points(profile.previous_loans.len()),
        employment_type: employment_type_points(profile.employment_type),
        job_tenure: job_tenure_points(profile.years_in_current_job),
        demographics: demographic_points(profile.age),
    };

    let raw = MIN_SCORE as u32 + breakdown.total();
    let score = CreditScore(raw.min(MAX_SCORE as u32) as u16);

    Ok(CreditReport {
        score,
        band: score.band(),
        breakdown,
    })
}

/// Yearly debt load (previous principal plus twelve months of card spend)
/// as a percentage of annual income.
fn utilization_percent(profile: &ApplicantProfile) -> f64 {
    let obligations = profile.total_previous_loan_amount() + profile.avg_credit_card_usage * 12.0;
    obligations / profile.annual_income * 100.0
}

fn utilization_points(percent: f64) -> u32 {
    if percent <= 30.0 {
        360
    } else if percent <= 50.0 {
        270
    } else if percent <= 70.0 {
        180
    } else {
        90
    }
}

// No repayment record exists, so having borrowed before stands in for
// "always paid on time".
fn payment_history_points(has_previous_loans: bool) -> u32 {
    if has_previous_loans {
        225
    } else {
        150
    }
}

fn credit_age_points(oldest_loan_years: u32) -> u32 {
    match oldest_loan_years {
        5.. => 45,
        2..=4 => 30,
        _ => 15,
    }
}

fn inquiry_points(loan_count: usize) -> u32 {
    match loan_count {
        0 => 90,
        1..=2 => 60,
        _ => 30,
    }
}

fn employment_type_points(employment: EmploymentType) -> u32 {
    match employment {
        EmploymentType::Salaried => 45,
        EmploymentType::SelfEmployed => 30,
        EmploymentType::Unemployed => 15,
    }
}

fn job_tenure_points(years: u32) -> u32 {
    match years {
        3.. => 45,
        1..=2 => 30,
        0 => 15,
    }
}

fn demographic_points(age: u32) -> u32 {
    match age {
        25..=45 => 90,
        0..=24 => 60,
        _ => 75,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::profile::PreviousLoan;

    fn base_profile() -> ApplicantProfile {
        ApplicantProfile {
            annual_income: 1_200_000.0,
            employment_type: EmploymentType::Salaried,
            years_in_current_job: 4,
            age: 30,
            has_previous_loans: false,
            previous_loans: vec![],
            loan_rejection_history: false,
            avg_credit_card_usage: 10_000.0,
        }
    }

    fn loan(amount: f64, age: u32) -> PreviousLoan {
        PreviousLoan {
            loan_amount: amount,
            emi_amount: amount / 50.0,
            loan_age: age,
            interest_rate: None,
        }
    }

    #[test]
    fn test_strong_profile_is_capped_at_900() {
        let report = compute_credit_report(&base_profile()).unwrap();
        assert!((report.breakdown.utilization_percent - 10.0).abs() < 1e-9);
        // 300 + 360 + 150 + 15 + 90 + 45 + 45 + 90 = 1095
        assert_eq!(MIN_SCORE as u32 + report.breakdown.total(), 1095);
        assert_eq!(report.score.value(), 900);
        assert_eq!(report.band, ScoreBand::Excellent);
    }

    #[test]
    fn test_unemployed_older_profile_still_capped() {
        let mut profile = base_profile();
        profile.employment_type = EmploymentType::Unemployed;
        profile.age = 50;
        profile.years_in_current_job = 0;
        let report = compute_credit_report(&profile).unwrap();
        assert_eq!(MIN_SCORE as u32 + report.breakdown.total(), 1020);
        assert_eq!(report.score.value(), 900);
    }

    #[test]
    fn test_heavily_leveraged_profile_lands_below_cap() {
        let profile = ApplicantProfile {
            annual_income: 300_000.0,
            employment_type: EmploymentType::Unemployed,
            years_in_current_job: 0,
            age: 22,
            has_previous_loans: true,
            previous_loans: vec![loan(400_000.0, 1), loan(100_000.0, 1), loan(50_000.0, 0)],
            loan_rejection_history: true,
            avg_credit_card_usage: 20_000.0,
        };
        let report = compute_credit_report(&profile).unwrap();
        // utilization (550k + 240k) / 300k = 263% → 90
        // 300 + 90 + 225 + 15 + 30 + 15 + 15 + 60 = 750
        assert_eq!(report.score.value(), 750);
        assert_eq!(report.breakdown.utilization, 90);
        assert_eq!(report.breakdown.recent_inquiries, 30);
    }

    #[test]
    fn test_utilization_tier_boundaries_are_inclusive() {
        assert_eq!(utilization_points(30.0), 360);
        assert_eq!(utilization_points(30.0001), 270);
        assert_eq!(utilization_points(50.0), 270);
        assert_eq!(utilization_points(70.0), 180);
        assert_eq!(utilization_points(70.5), 90);
    }

    #[test]
    fn test_factor_tier_boundaries() {
        assert_eq!(credit_age_points(5), 45);
        assert_eq!(credit_age_points(4), 30);
        assert_eq!(credit_age_points(2), 30);
        assert_eq!(credit_age_points(1), 15);
        assert_eq!(inquiry_points(0), 90);
        assert_eq!(inquiry_points(2), 60);
        assert_eq!(inquiry_points(3), 30);
        assert_eq!(job_tenure_points(3), 45);
        assert_eq!(job_tenure_points(1), 30);
        assert_eq!(job_tenure_points(0), 15);
        assert_eq!(demographic_points(25), 90);
        assert_eq!(demographic_points(45), 90);
        assert_eq!(demographic_points(24), 60);
        assert_eq!(demographic_points(46), 75);
    }

    #[test]
    fn test_score_is_deterministic() {
        let profile = ApplicantProfile {
            has_previous_loans: true,
            previous_loans: vec![loan(900_000.0, 3)],
            ..base_profile()
        };
        let first = compute_credit_score(&profile).unwrap();
        for _ in 0..10 {
            assert_eq!(compute_credit_score(&profile).unwrap(), first);
        }
    }

    #[test]
    fn test_lower_utilization_never_lowers_score() {
        let mut previous: Option<u16> = None;
        // Walk card usage downwards; scores must be non-decreasing.
        for usage in [120_000.0, 70_000.0, 60_000.0, 45_000.0, 30_000.0, 5_000.0, 0.0] {
            let profile = ApplicantProfile {
                employment_type: EmploymentType::Unemployed,
                years_in_current_job: 0,
                age: 60,
                avg_credit_card_usage: usage,
                ..base_profile()
            };
            let score = compute_credit_score(&profile).unwrap().value();
            if let Some(prev) = previous {
                assert!(score >= prev, "usage {usage} dropped score {prev} -> {score}");
            }
            previous = Some(score);
        }
    }

    #[test]
    fn test_score_always_in_range() {
        let incomes = [1.0, 50_000.0, 1_200_000.0, 1e12];
        let usages = [0.0, 1_000.0, 1e9];
        let ages = [0, 18, 30, 90];
        for income in incomes {
            for usage in usages {
                for age in ages {
                    let profile = ApplicantProfile {
                        annual_income: income,
                        avg_credit_card_usage: usage,
                        age,
                        ..base_profile()
                    };
                    let score = compute_credit_score(&profile).unwrap().value();
                    assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
                }
            }
        }
    }

    #[test]
    fn test_zero_income_rejected() {
        let profile = ApplicantProfile {
            annual_income: 0.0,
            ..base_profile()
        };
        assert!(matches!(
            compute_credit_score(&profile),
            Err(ScoringError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_inconsistent_loan_flag_rejected() {
        let profile = ApplicantProfile {
            has_previous_loans: true,
            ..base_profile()
        };
        assert!(compute_credit_score(&profile).is_err());
    }

    #[test]
    fn test_rejection_history_has_no_weight() {
        let clean = compute_credit_report(&base_profile()).unwrap();
        let rejected = compute_credit_report(&ApplicantProfile {
            loan_rejection_history: true,
            ..base_profile()
        })
        .unwrap();
        assert_eq!(clean.breakdown, rejected.breakdown);
    }

    #[test]
    fn test_credit_score_new_enforces_range() {
        assert!(CreditScore::new(299).is_err());
        assert!(CreditScore::new(901).is_err());
        assert_eq!(CreditScore::new(300).unwrap().value(), 300);
        assert_eq!(CreditScore::new(900).unwrap().value(), 900);
    }

    #[test]
    fn test_bands() {
        assert_eq!(CreditScore::new(750).unwrap().band(), ScoreBand::Excellent);
        assert_eq!(CreditScore::new(749).unwrap().band(), ScoreBand::Good);
        assert_eq!(CreditScore::new(650).unwrap().band(), ScoreBand::Good);
        assert_eq!(CreditScore::new(649).unwrap().band(), ScoreBand::Fair);
        assert_eq!(CreditScore::new(550).unwrap().band(), ScoreBand::Fair);
        assert_eq!(CreditScore::new(549).unwrap().band(), ScoreBand::Poor);
    }

    #[test]
    fn test_score_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<CreditScore>("1000").is_err());
        let score: CreditScore = serde_json::from_str("700").unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), "700");
    }
}
