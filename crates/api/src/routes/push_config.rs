//! Public VAPID key for browser-side subscription.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use pushbell_common::error::AppError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/push-config", get(push_config))
}

/// GET /api/push-config: Return `{publicKey}`; never cached by intermediaries.
async fn push_config(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let public_key = state.config.vapid_public_key()?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "publicKey": public_key })),
    ))
}
