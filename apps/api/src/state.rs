use std::sync::Arc;

use sqlx::PgPool;

use crate::applications::advice::AdvisoryGenerator;
use crate::catalog::cache::CatalogCache;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Redis when `REDIS_URL` is set, process memory otherwise.
    pub catalog_cache: Arc<dyn CatalogCache>,
    /// Default: `LlmAdvisor`.
    pub advisor: Arc<dyn AdvisoryGenerator>,
}
