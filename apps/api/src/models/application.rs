use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: String,
    pub loan_id: Uuid,
    pub bank_name: String,
    pub loan_type: String,
    pub interest_rate: f64,
    pub requested_amount: f64,
    /// Months.
    pub requested_tenure: i32,
    pub status: String,
    pub ai_advice: String,
    pub application_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    UnderReview,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::UnderReview => "under_review",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            other => Err(format!(
                "unknown status '{other}' (expected pending, approved, rejected or under_review)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
            ApplicationStatus::UnderReview,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("cancelled".parse::<ApplicationStatus>().is_err());
        assert!("Pending".parse::<ApplicationStatus>().is_err());
    }
}
