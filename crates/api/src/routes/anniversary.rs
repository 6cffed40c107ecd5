//! Anniversary check route.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};

use pushbell_common::error::AppError;
use pushbell_engine::anniversary::{AnniversaryCheck, AnniversaryOutcome};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/anniversary-check", post(anniversary_check))
}

/// POST /api/anniversary-check: Run the daily check for today's UTC date.
async fn anniversary_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let body = run_check(&state, Utc::now().date_naive()).await?;
    Ok(Json(body))
}

/// Shared by the route and the in-process daily schedule.
pub async fn run_check(state: &AppState, today: NaiveDate) -> Result<Value, AppError> {
    let backend = state.backend.get().await?;
    let outcome = AnniversaryCheck::run(backend.dispatcher(), today).await?;
    Ok(outcome_body(&outcome))
}

pub fn outcome_body(outcome: &AnniversaryOutcome) -> Value {
    match outcome {
        AnniversaryOutcome::Skipped => json!({ "ok": true, "skipped": true }),
        AnniversaryOutcome::Dispatched {
            sent,
            is_monthly,
            is_yearly,
        } => json!({
            "ok": true,
            "sent": sent,
            "isMonthly": is_monthly,
            "isYearly": is_yearly,
        }),
    }
}
