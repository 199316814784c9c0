use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::credit_score::{CreditScore, ScoreBand};
use super::number_format::format_with_commas;
use super::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanCategory {
    Home,
    Car,
    Gold,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 3] = [LoanCategory::Home, LoanCategory::Car, LoanCategory::Gold];

    pub fn as_str(self) -> &'static str {
        match self {
            LoanCategory::Home => "home",
            LoanCategory::Car => "car",
            LoanCategory::Gold => "gold",
        }
    }

    /// Label the catalog stores in `bank_loans.loan_type`.
    pub fn catalog_loan_type(self) -> &'static str {
        match self {
            LoanCategory::Home => "Home Loan",
            LoanCategory::Car => "Car Loan",
            LoanCategory::Gold => "Gold Loan",
        }
    }

    /// Annual rate in percent before the score adjustment.
    pub fn base_rate(self) -> f64 {
        match self {
            LoanCategory::Home => 8.50,
            LoanCategory::Car => 7.25,
            LoanCategory::Gold => 7.00,
        }
    }

    pub fn max_amount(self) -> f64 {
        match self {
            LoanCategory::Home => 10_000_000.0,
            LoanCategory::Car => 1_500_000.0,
            LoanCategory::Gold => 500_000.0,
        }
    }

    pub fn eligibility(self, score: CreditScore) -> LoanEligibility {
        let tier = Tier::for_band(score.band());
        let interest_rate = round_to_cents(self.base_rate() + tier.rate_adjustment);
        let max_eligible_amount = (self.max_amount() * tier.amount_share).round();
        LoanEligibility {
            category: self,
            is_eligible: true,
            max_eligible_amount,
            interest_rate,
            message: tier.message(self, interest_rate, max_eligible_amount),
        }
    }
}

impl FromStr for LoanCategory {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(LoanCategory::Home),
            "car" => Ok(LoanCategory::Car),
            "gold" => Ok(LoanCategory::Gold),
            _ => Err(ScoringError::UnknownLoanCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEligibility {
    pub category: LoanCategory,
    pub is_eligible: bool,
    pub max_eligible_amount: f64,
    pub interest_rate: f64,
    pub message: String,
}

/// Looks up eligibility for a category given as free text.
pub fn resolve_eligibility(
    score: CreditScore,
    category: &str,
) -> Result<LoanEligibility, ScoringError> {
    Ok(category.parse::<LoanCategory>()?.eligibility(score))
}

/// Eligibility for every category, in `LoanCategory::ALL` order.
pub fn resolve_all(score: CreditScore) -> Vec<LoanEligibility> {
    LoanCategory::ALL
        .iter()
        .map(|category| category.eligibility(score))
        .collect()
}

struct Tier {
    band: ScoreBand,
    rate_adjustment: f64,
    amount_share: f64,
}

impl Tier {
    // Every tier stays eligible; weaker scores get a smaller cap and a
    // higher rate instead of a rejection.
    fn for_band(band: ScoreBand) -> Tier {
        let (rate_adjustment, amount_share) = match band {
            ScoreBand::Excellent => (0.0, 0.90),
            ScoreBand::Good => (0.5, 0.75),
            ScoreBand::Fair => (1.5, 0.60),
            ScoreBand::Poor => (2.5, 0.40),
        };
        Tier {
            band,
            rate_adjustment,
            amount_share,
        }
    }

    fn message(&self, category: LoanCategory, rate: f64, amount: f64) -> String {
        let amount = format_with_commas(&format!("{amount:.0}"));
        match self.band {
            ScoreBand::Excellent => format!(
                "Excellent credit score! You qualify for our best {category} loan rate of {rate:.2}% on up to ₹{amount}."
            ),
            ScoreBand::Good => format!(
                "Good credit score. Competitive {category} loan rate of {rate:.2}% available on up to ₹{amount}."
            ),
            ScoreBand::Fair => format!(
                "Fair credit score. A {category} loan is available at {rate:.2}% on up to ₹{amount}."
            ),
            ScoreBand::Poor => format!(
                "A reduced {category} loan is available at {rate:.2}% on up to ₹{amount}. Improving your credit score unlocks better terms."
            ),
        }
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
