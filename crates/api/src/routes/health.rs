//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Reports liveness only. `backend` says whether the push clients have been
/// built yet; it does not probe them.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "pushbell-api",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": if state.backend.is_initialized() { "ready" } else { "lazy" }
    }))
}
