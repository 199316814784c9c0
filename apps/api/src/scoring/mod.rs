//! Credit score estimation and loan eligibility.
//!
//! Everything in here is a pure function of its input: no I/O, no logging,
//! no shared state. Handlers in `scoring::handlers` and `comparison` own the
//! request plumbing and decide what to log.

pub mod credit_score;
pub mod eligibility;
pub mod handlers;
pub mod number_format;
pub mod profile;

use thiserror::Error;

/// Failures the engine reports back to its caller. All are recoverable by
/// asking the user to correct their input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("{field}: '{value}' is not a valid number")]
    Parse { field: String, value: String },

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("unknown loan category '{0}' (expected home, car or gold)")]
    UnknownLoanCategory(String),

    #[error("credit score {0} is outside 300-900")]
    ScoreOutOfRange(i64),
}

impl ScoringError {
    pub(crate) fn parse(field: &str, value: &str) -> Self {
        Self::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ScoringError::Parse { .. } => "PARSE_ERROR",
            ScoringError::InvalidProfile(_) => "INVALID_PROFILE",
            ScoringError::UnknownLoanCategory(_) => "UNKNOWN_LOAN_CATEGORY",
            ScoringError::ScoreOutOfRange(_) => "SCORE_OUT_OF_RANGE",
        }
    }
}
