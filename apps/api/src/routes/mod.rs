pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::catalog::handlers as catalog;
use crate::comparison::handlers as comparison;
use crate::preferences::handlers as preferences;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/db", get(health::db_health_handler))
        // Scoring
        .route("/api/v1/credit-score", post(scoring::handle_credit_score))
        .route("/api/v1/eligibility", post(scoring::handle_eligibility))
        // Comparisons
        .route(
            "/api/v1/comparisons",
            post(comparison::handle_create_comparison),
        )
        .route(
            "/api/v1/comparisons/user/:user_id",
            get(comparison::handle_comparison_history),
        )
        // Catalog
        .route("/api/v1/banks", get(catalog::handle_list_banks))
        .route(
            "/api/v1/banks/personalized",
            get(catalog::handle_personalized),
        )
        .route("/api/v1/banks/raw", post(catalog::handle_store_raw))
        .route(
            "/api/v1/banks/generate-models",
            post(catalog::handle_generate_models),
        )
        .route(
            "/api/v1/banks/type/:loan_type",
            get(catalog::handle_loans_by_type),
        )
        .route(
            "/api/v1/banks/filter/:user_id",
            get(catalog::handle_filter_for_user),
        )
        .route("/api/v1/banks/:id", get(catalog::handle_get_bank))
        // Preferences
        .route(
            "/api/v1/users/preferences",
            post(preferences::handle_create_preferences),
        )
        .route(
            "/api/v1/users/preferences/:user_id",
            get(preferences::handle_get_preferences).put(preferences::handle_update_preferences),
        )
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_submit_application),
        )
        .route(
            "/api/v1/applications/user/:user_id",
            get(applications::handle_user_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .with_state(state)
}
