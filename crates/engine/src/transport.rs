//! Push transport contract.

use async_trait::async_trait;
use thiserror::Error;

use pushbell_common::types::DeliverableSubscription;

/// A failed delivery as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeliveryError {
    /// HTTP status returned by the push service, when one is known
    pub status_code: Option<u16>,
    pub message: String,
}

impl DeliveryError {
    pub fn new(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// 404 and 410 mean the endpoint no longer exists and will never accept
    /// another message.
    pub fn is_gone(&self) -> bool {
        matches!(self.status_code, Some(404) | Some(410))
    }
}

/// Delivers an encoded payload to a single browser push endpoint.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &DeliverableSubscription,
        payload: &str,
    ) -> Result<(), DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gone_only_for_404_and_410() {
        assert!(DeliveryError::new(Some(404), "not found").is_gone());
        assert!(DeliveryError::new(Some(410), "gone").is_gone());
        assert!(!DeliveryError::new(Some(400), "bad").is_gone());
        assert!(!DeliveryError::new(Some(500), "boom").is_gone());
        assert!(!DeliveryError::new(None, "io").is_gone());
    }
}
