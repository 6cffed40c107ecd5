//! Notification dispatcher.
//!
//! Fetches the subscriptions matching a selector, attempts exactly one delivery
//! to each in store order, and prunes subscriptions whose endpoint the push
//! service reports as gone (404/410).

use std::sync::Arc;

use pushbell_common::error::AppError;
use pushbell_common::types::{DeliveryResult, DispatchSummary, Payload};

use crate::store::{Selector, SubscriptionStore};
use crate::transport::PushTransport;

/// Failure reason recorded for records missing an endpoint or keys.
pub const INVALID_SUBSCRIPTION: &str = "invalid subscription";

pub struct Dispatcher {
    store: Arc<dyn SubscriptionStore>,
    transport: Arc<dyn PushTransport>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn SubscriptionStore>, transport: Arc<dyn PushTransport>) -> Self {
        Self { store, transport }
    }

    /// Deliver `payload` to every subscription matching `selector`.
    ///
    /// Only a failed store read fails the call. Individual delivery failures
    /// are recorded in the summary.
    pub async fn dispatch(
        &self,
        selector: &Selector,
        payload: &Payload,
    ) -> Result<DispatchSummary, AppError> {
        let subscriptions = self.store.list(selector).await?;

        if subscriptions.is_empty() {
            tracing::debug!(selector = %selector, "No subscriptions matched");
            return Ok(DispatchSummary::default());
        }

        let encoded = serde_json::to_string(payload)?;
        let mut summary = DispatchSummary::default();

        for stored in &subscriptions {
            let Some(target) = stored
                .subscription
                .as_ref()
                .and_then(|sub| sub.deliverable())
            else {
                tracing::warn!(subscription_id = %stored.id, "Skipping invalid subscription");
                summary
                    .results
                    .push(DeliveryResult::failed(&stored.id, None, INVALID_SUBSCRIPTION));
                continue;
            };

            match self.transport.send(&target, &encoded).await {
                Ok(()) => {
                    summary.sent += 1;
                    summary.results.push(DeliveryResult::delivered(&stored.id));
                }
                Err(err) => {
                    tracing::warn!(
                        subscription_id = %stored.id,
                        status_code = ?err.status_code,
                        error = %err,
                        "Push delivery failed"
                    );

                    if err.is_gone() {
                        self.prune(&stored.id).await;
                    }

                    summary
                        .results
                        .push(DeliveryResult::failed(&stored.id, err.status_code, err.message));
                }
            }
        }

        tracing::info!(
            selector = %selector,
            matched = subscriptions.len(),
            sent = summary.sent,
            "Dispatch finished"
        );

        Ok(summary)
    }

    /// Best-effort removal of an expired subscription. Errors are logged only.
    async fn prune(&self, id: &str) {
        match self.store.delete(id).await {
            Ok(()) => tracing::info!(subscription_id = %id, "Expired subscription removed"),
            Err(e) => {
                tracing::warn!(subscription_id = %id, error = %e, "Failed to remove expired subscription")
            }
        }
    }
}
