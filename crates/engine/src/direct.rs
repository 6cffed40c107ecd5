//! On-demand send to a single user's subscriptions.

use serde::Deserialize;
use serde_json::Value;

use pushbell_common::error::AppError;
use pushbell_common::types::{DEFAULT_TITLE, DispatchSummary, KnownUser, Payload};

use crate::dispatcher::Dispatcher;
use crate::store::Selector;

/// Raw request body. Fields are loosely typed and coerced during validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPushRequest {
    pub target_user: Option<Value>,
    pub title: Option<Value>,
    pub body: Option<Value>,
    pub data: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectMessage {
    pub target: KnownUser,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectOutcome {
    /// The target user has no stored subscriptions.
    NoSubscribers,
    Delivered(DispatchSummary),
}

pub struct DirectSend;

impl DirectSend {
    /// Normalise and validate a request. Never touches the store.
    pub fn validate(request: SendPushRequest) -> Result<DirectMessage, AppError> {
        let target = coerce_text(request.target_user.as_ref())
            .unwrap_or_default()
            .to_lowercase()
            .parse::<KnownUser>()
            .map_err(|_| {
                let names: Vec<String> = KnownUser::ALL
                    .iter()
                    .map(|u| format!("'{}'", u))
                    .collect();
                AppError::Validation(format!("targetUser must be {}", names.join(" or ")))
            })?;

        let title = coerce_text(request.title.as_ref()).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let body = coerce_text(request.body.as_ref()).unwrap_or_default();
        let data = match request.data {
            Some(data @ (Value::Object(_) | Value::Array(_))) => data,
            _ => Value::Object(Default::default()),
        };

        Ok(DirectMessage {
            target,
            payload: Payload::new(title, body).with_data(data),
        })
    }

    pub async fn run(
        dispatcher: &Dispatcher,
        message: &DirectMessage,
    ) -> Result<DirectOutcome, AppError> {
        let summary = dispatcher
            .dispatch(&Selector::User(message.target), &message.payload)
            .await?;

        if summary.results.is_empty() {
            tracing::info!(target_user = %message.target, "No subscriptions for target user");
            return Ok(DirectOutcome::NoSubscribers);
        }

        Ok(DirectOutcome::Delivered(summary))
    }
}

/// Turn a loosely typed JSON field into text. Empty, null, false and zero
/// count as absent.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
