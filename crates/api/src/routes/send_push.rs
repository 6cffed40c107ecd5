//! On-demand push route.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use pushbell_common::error::AppError;
use pushbell_engine::direct::{DirectOutcome, DirectSend, SendPushRequest};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/send-push", post(send_push))
}

/// POST /api/send-push: Notify every device of one user.
///
/// Body: `{targetUser, title?, body, data?}`. An empty body is treated as `{}`
/// and then fails validation.
async fn send_push(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    let backend = state.backend.get().await?;

    let request: SendPushRequest = if body.is_empty() {
        SendPushRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Decode(format!("Invalid JSON body: {}", e)))?
    };
    let message = DirectSend::validate(request)?;

    let response = match DirectSend::run(backend.dispatcher(), &message).await? {
        DirectOutcome::NoSubscribers => json!({
            "ok": true,
            "sent": 0,
            "info": "No subscriptions for target user",
        }),
        DirectOutcome::Delivered(summary) => json!({
            "ok": true,
            "sent": summary.sent,
            "results": summary.results,
        }),
    };

    Ok(Json(response))
}
