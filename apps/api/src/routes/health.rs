use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and what the process loaded at startup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "admissions-api",
        "catalog": {
            "colleges": state.catalog.colleges().len(),
            "branches": state.catalog.branch_count()
        },
        "session_store": state.chat.store_backend()
    }))
}
