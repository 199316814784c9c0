//! Pluggable advisory text for submitted applications.
//!
//! `AppState` holds an `Arc<dyn AdvisoryGenerator>`; the LLM-backed
//! `LlmAdvisor` is the only production implementation.

use async_trait::async_trait;
use serde::Serialize;

use crate::applications::prompts::{ADVICE_PROMPT, ADVICE_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::NO_INVENTED_FIGURES;
use crate::llm_client::{CallOptions, LlmClient};
use crate::models::application::ApplicationRow;

#[async_trait]
pub trait AdvisoryGenerator: Send + Sync {
    async fn advise(&self, application: &ApplicationRow) -> Result<String, AppError>;
}

pub struct LlmAdvisor {
    llm: LlmClient,
}

impl LlmAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

/// The part of an application the advisor gets to see. Internal ids and
/// notes stay out of the prompt.
#[derive(Serialize)]
struct AdviceInput<'a> {
    bank_name: &'a str,
    loan_type: &'a str,
    interest_rate: f64,
    requested_amount: f64,
    requested_tenure_months: i32,
}

pub(crate) fn build_advice_prompt(application: &ApplicationRow) -> Result<String, AppError> {
    let input = AdviceInput {
        bank_name: &application.bank_name,
        loan_type: &application.loan_type,
        interest_rate: application.interest_rate,
        requested_amount: application.requested_amount,
        requested_tenure_months: application.requested_tenure,
    };
    let json = serde_json::to_string_pretty(&input).map_err(anyhow::Error::from)?;
    Ok(ADVICE_PROMPT.replace("{application}", &json))
}

#[async_trait]
impl AdvisoryGenerator for LlmAdvisor {
    async fn advise(&self, application: &ApplicationRow) -> Result<String, AppError> {
        let prompt = build_advice_prompt(application)?;
        let system = format!("{ADVICE_SYSTEM} {NO_INVENTED_FIGURES}");
        Ok(self
            .llm
            .call_text(&prompt, &system, CallOptions::ADVICE)
            .await?)
    }
}
