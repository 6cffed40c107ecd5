//! Web Push transport: VAPID-signed, aes128gcm-encrypted delivery.

use async_trait::async_trait;
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder,
};

use pushbell_common::config::VapidConfig;
use pushbell_common::error::AppError;
use pushbell_common::types::DeliverableSubscription;

use crate::transport::{DeliveryError, PushTransport};

pub struct WebPushTransport {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
    ttl: u32,
}

impl WebPushTransport {
    pub fn new(vapid: VapidConfig, ttl: u32) -> Result<Self, AppError> {
        let client = IsahcWebPushClient::new()
            .map_err(|e| AppError::Internal(format!("Failed to create push client: {}", e)))?;

        Ok(Self { client, vapid, ttl })
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &DeliverableSubscription,
        payload: &str,
    ) -> Result<(), DeliveryError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.as_str(),
            subscription.p256dh.as_str(),
            subscription.auth.as_str(),
        );

        let mut signature = VapidSignatureBuilder::from_base64(&self.vapid.private_key, &info)?;
        signature.add_claim("sub", self.vapid.subject.clone());

        let mut message = WebPushMessageBuilder::new(&info);
        message.set_payload(ContentEncoding::Aes128Gcm, payload.as_bytes());
        message.set_vapid_signature(signature.build()?);
        message.set_ttl(self.ttl);

        self.client.send(message.build()?).await?;
        Ok(())
    }
}

impl From<WebPushError> for DeliveryError {
    fn from(err: WebPushError) -> Self {
        DeliveryError::new(status_for_kind(err.short_description()), err.to_string())
    }
}

/// Map a web-push error kind back to the HTTP status the push service sent.
fn status_for_kind(kind: &str) -> Option<u16> {
    match kind {
        "bad_request" => Some(400),
        "unauthorized" => Some(401),
        "endpoint_not_found" => Some(404),
        "endpoint_not_valid" => Some(410),
        "payload_too_large" => Some(413),
        "server_error" => Some(500),
        "not_implemented" => Some(501),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_endpoints_map_to_gone_statuses() {
        assert_eq!(status_for_kind("endpoint_not_found"), Some(404));
        assert_eq!(status_for_kind("endpoint_not_valid"), Some(410));
        assert!(DeliveryError::new(status_for_kind("endpoint_not_valid"), "x").is_gone());
    }

    #[test]
    fn test_local_failures_have_no_status() {
        assert_eq!(status_for_kind("invalid_crypto_keys"), None);
        assert_eq!(status_for_kind("io_error"), None);
    }

    #[test]
    fn test_unauthorized_is_not_pruned() {
        let err = DeliveryError::new(status_for_kind("unauthorized"), "bad vapid");
        assert_eq!(err.status_code, Some(401));
        assert!(!err.is_gone());
    }
}
