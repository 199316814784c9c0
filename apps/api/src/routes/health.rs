use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

use crate::db::ping;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "loan-compare-api"
    }))
}

/// GET /health/db
pub async fn db_health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match ping(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "connected" })),
        ),
        Err(e) => {
            error!("Database health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "database": "unreachable" })),
            )
        }
    }
}
