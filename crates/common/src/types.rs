use serde::{Deserialize, Serialize};

/// Default notification title when none is supplied.
pub const DEFAULT_TITLE: &str = "Diego Y Danna";

/// The fixed set of users a subscription can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownUser {
    Diego,
    Danna,
}

impl KnownUser {
    pub const ALL: [KnownUser; 2] = [KnownUser::Diego, KnownUser::Danna];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownUser::Diego => "diego",
            KnownUser::Danna => "danna",
        }
    }
}

impl std::fmt::Display for KnownUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KnownUser {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is not trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "diego" => Ok(KnownUser::Diego),
            "danna" => Ok(KnownUser::Danna),
            other => Err(format!("unknown user '{}'", other)),
        }
    }
}

/// Encryption material issued by the browser alongside the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

/// A browser push subscription as stored. Any field may be absent in a
/// malformed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: Option<String>,
    pub keys: Option<SubscriptionKeys>,
    /// Browsers report either `null` or a millisecond timestamp
    pub expiration_time: Option<serde_json::Value>,
}

/// A push subscription with every field the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverableSubscription {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    /// Returns `None` when the endpoint or either key is missing or empty.
    pub fn deliverable(&self) -> Option<DeliverableSubscription> {
        let endpoint = self.endpoint.as_deref().filter(|e| !e.is_empty())?;
        let keys = self.keys.as_ref()?;
        let p256dh = keys.p256dh.as_deref().filter(|k| !k.is_empty())?;
        let auth = keys.auth.as_deref().filter(|k| !k.is_empty())?;

        Some(DeliverableSubscription {
            endpoint: endpoint.to_string(),
            p256dh: p256dh.to_string(),
            auth: auth.to_string(),
        })
    }
}

/// A subscription document read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubscription {
    /// Store-assigned document id
    pub id: String,
    /// `None` when the document has no `subscription` field at all
    pub subscription: Option<PushSubscription>,
    /// Owning user tag, kept as stored
    pub user: Option<String>,
}

/// Notification content pushed to browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub title: String,
    pub body: String,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl Payload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: empty_object(),
            tag: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn delivered(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ok: true,
            status_code: None,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, status_code: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ok: false,
            status_code,
            error: Some(error.into()),
        }
    }
}

/// Aggregate of a dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub sent: u32,
    pub results: Vec<DeliveryResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_user_parse_is_case_insensitive() {
        assert_eq!("DIEGO".parse::<KnownUser>().unwrap(), KnownUser::Diego);
        assert_eq!("Danna".parse::<KnownUser>().unwrap(), KnownUser::Danna);
        assert!("mallory".parse::<KnownUser>().is_err());
        assert!("".parse::<KnownUser>().is_err());
    }

    #[test]
    fn test_deliverable_requires_endpoint_and_keys() {
        let full = PushSubscription {
            endpoint: Some("https://push.example/abc".to_string()),
            keys: Some(SubscriptionKeys {
                p256dh: Some("p".to_string()),
                auth: Some("a".to_string()),
            }),
            expiration_time: None,
        };
        assert!(full.deliverable().is_some());

        let mut no_endpoint = full.clone();
        no_endpoint.endpoint = None;
        assert!(no_endpoint.deliverable().is_none());

        let mut no_keys = full.clone();
        no_keys.keys = None;
        assert!(no_keys.deliverable().is_none());

        let mut half_keys = full;
        half_keys.keys.as_mut().unwrap().auth = None;
        assert!(half_keys.deliverable().is_none());
    }

    #[test]
    fn test_delivery_result_omits_empty_fields() {
        let json = serde_json::to_value(DeliveryResult::delivered("doc1")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "doc1", "ok": true}));

        let json = serde_json::to_value(DeliveryResult::failed("doc2", Some(410), "gone")).unwrap();
        assert_eq!(json["statusCode"], 410);
        assert_eq!(json["error"], "gone");
    }

    #[test]
    fn test_payload_serializes_without_tag() {
        let payload = Payload::new("t", "b").with_data(serde_json::json!({"url": "/"}));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"title": "t", "body": "b", "data": {"url": "/"}}));
    }
}
