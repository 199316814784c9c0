//! Side-by-side comparison: one profile scored once, eligibility for every
//! category, and catalog offers for the category the user is shopping for.

pub mod handlers;
pub mod repository;

use serde::Serialize;

use crate::catalog::emi::{rank_offers, OfferCriteria, RankedOffer};
use crate::models::bank::BankLoanRow;
use crate::scoring::credit_score::{compute_credit_report, CreditReport};
use crate::scoring::eligibility::{resolve_all, LoanCategory, LoanEligibility};
use crate::scoring::profile::ApplicantProfile;
use crate::scoring::ScoringError;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub report: CreditReport,
    pub eligibility: Vec<LoanEligibility>,
    /// Empty when no category was requested.
    pub offers: Vec<RankedOffer>,
    /// The amount offers were matched against, when a category was requested.
    pub matched_amount: Option<f64>,
}

/// Amount the user can actually shop for: the desired amount, never above
/// the eligible cap.
pub fn offer_amount(eligibility: &LoanEligibility, desired: Option<f64>) -> f64 {
    let cap = eligibility.max_eligible_amount;
    desired.map_or(cap, |d| d.min(cap))
}

/// Scores the profile and matches `catalog` against the requested category.
/// `catalog` is expected to hold only products of that category.
pub fn build_comparison(
    profile: &ApplicantProfile,
    category: Option<LoanCategory>,
    desired_amount: Option<f64>,
    catalog: Vec<BankLoanRow>,
) -> Result<ComparisonOutcome, ScoringError> {
    if let Some(amount) = desired_amount {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ScoringError::InvalidProfile(
                "desired_loan_amount must be greater than zero".to_string(),
            ));
        }
    }

    let report = compute_credit_report(profile)?;
    let eligibility = resolve_all(report.score);

    let (offers, matched_amount) = match category {
        Some(category) => {
            let amount = offer_amount(&category.eligibility(report.score), desired_amount);
            let offers = rank_offers(
                catalog,
                OfferCriteria {
                    loan_amount: Some(amount),
                    tenure: None,
                },
            );
            (offers, Some(amount))
        }
        None => (vec![], None),
    };

    Ok(ComparisonOutcome {
        report,
        eligibility,
        offers,
        matched_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::emi::tests::make_loan;
    use crate::scoring::profile::{EmploymentType, PreviousLoan};

    fn strong_profile() -> ApplicantProfile {
        ApplicantProfile {
            annual_income: 1_200_000.0,
            employment_type: EmploymentType::Salaried,
            years_in_current_job: 6,
            age: 32,
            has_previous_loans: true,
            previous_loans: vec![PreviousLoan {
                loan_amount: 200_000.0,
                emi_amount: 8_000.0,
                loan_age: 6,
                interest_rate: None,
            }],
            loan_rejection_history: false,
            avg_credit_card_usage: 5_000.0,
        }
    }

    #[test]
    fn test_no_category_means_no_offers() {
        let outcome = build_comparison(&strong_profile(), None, None, vec![]).unwrap();
        assert_eq!(outcome.eligibility.len(), 3);
        assert!(outcome.offers.is_empty());
        assert_eq!(outcome.matched_amount, None);
    }

    #[test]
    fn test_desired_amount_clamped_to_cap() {
        let outcome = build_comparison(
            &strong_profile(),
            Some(LoanCategory::Gold),
            Some(50_000_000.0),
            vec![],
        )
        .unwrap();
        let gold = outcome
            .eligibility
            .iter()
            .find(|e| e.category == LoanCategory::Gold)
            .unwrap();
        assert_eq!(outcome.matched_amount, Some(gold.max_eligible_amount));
    }

    #[test]
    fn test_offers_filtered_and_sorted() {
        let catalog = vec![
            make_loan("Costly", 9.5, (100_000.0, 5_000_000.0), (12, 84)),
            make_loan("Cheap", 8.1, (100_000.0, 5_000_000.0), (12, 84)),
            make_loan("TooSmall", 7.0, (10_000.0, 50_000.0), (12, 84)),
        ];
        let outcome = build_comparison(
            &strong_profile(),
            Some(LoanCategory::Car),
            Some(800_000.0),
            catalog,
        )
        .unwrap();
        let banks: Vec<&str> = outcome
            .offers
            .iter()
            .map(|o| o.loan.bank_name.as_str())
            .collect();
        assert_eq!(banks, vec!["Cheap", "Costly"]);
        assert_eq!(outcome.matched_amount, Some(800_000.0));
    }

    #[test]
    fn test_rejects_non_positive_desired_amount() {
        let err = build_comparison(&strong_profile(), Some(LoanCategory::Home), Some(0.0), vec![])
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidProfile(_)));
    }

    #[test]
    fn test_offer_amount_without_desired_uses_cap() {
        let eligibility = LoanCategory::Home.eligibility(
            crate::scoring::credit_score::CreditScore::new(800).unwrap(),
        );
        assert_eq!(offer_amount(&eligibility, None), eligibility.max_eligible_amount);
        assert_eq!(offer_amount(&eligibility, Some(1_000.0)), 1_000.0);
    }
}
