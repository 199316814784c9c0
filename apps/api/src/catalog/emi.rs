use serde::{Deserialize, Serialize};

use crate::models::bank::BankLoanRow;

/// Equated monthly instalment for `principal` at `annual_rate` percent over
/// `months`. Zero-rate products split the principal evenly.
pub fn monthly_instalment(principal: f64, annual_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }
    let n = months as f64;
    let r = annual_rate / 12.0 / 100.0;
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSummary {
    pub calculated_emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

impl RepaymentSummary {
    /// All three figures are rounded to whole rupees.
    pub fn new(principal: f64, annual_rate: f64, months: u32) -> Self {
        let emi = monthly_instalment(principal, annual_rate, months);
        let total = emi * months.max(1) as f64;
        Self {
            calculated_emi: emi.round(),
            total_payment: total.round(),
            total_interest: (total - principal).round(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedOffer {
    #[serde(flatten)]
    pub loan: BankLoanRow,
    #[serde(flatten)]
    pub repayment: Option<RepaymentSummary>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OfferCriteria {
    pub loan_amount: Option<f64>,
    /// Months.
    pub tenure: Option<u32>,
}

/// Keeps products whose amount and tenure ranges admit the criteria, cheapest
/// rate first. Repayment figures are attached only when both amount and
/// tenure are known.
pub fn rank_offers(loans: Vec<BankLoanRow>, criteria: OfferCriteria) -> Vec<RankedOffer> {
    let mut matching: Vec<BankLoanRow> = loans
        .into_iter()
        .filter(|loan| criteria.loan_amount.map_or(true, |a| loan.admits_amount(a)))
        .filter(|loan| {
            criteria
                .tenure
                .map_or(true, |t| loan.admits_tenure(t as i32))
        })
        .collect();

    matching.sort_by(|a, b| a.interest_rate.total_cmp(&b.interest_rate));

    matching
        .into_iter()
        .map(|loan| {
            let repayment = match (criteria.loan_amount, criteria.tenure) {
                (Some(amount), Some(months)) => {
                    Some(RepaymentSummary::new(amount, loan.interest_rate, months))
                }
                _ => None,
            };
            RankedOffer { loan, repayment }
        })
        .collect()
}
