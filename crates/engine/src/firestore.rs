//! Firestore-backed subscription store (REST API v1).
//!
//! Documents look like `{subscription: {endpoint, keys: {p256dh, auth}}, user}`.
//! Firestore returns typed values (`stringValue`, `mapValue`, ...) which are
//! flattened to plain JSON before deserialising.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use pushbell_common::config::ServiceAccount;
use pushbell_common::error::AppError;
use pushbell_common::types::{PushSubscription, StoredSubscription};

use crate::store::{Selector, SubscriptionStore};
use crate::token::TokenSource;

const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

/// One element of a `:runQuery` response stream. Elements without a
/// document only carry read metadata.
#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<Document>,
}

pub struct FirestoreStore {
    http: reqwest::Client,
    tokens: TokenSource,
    collection: String,
}

impl FirestoreStore {
    pub fn new(account: ServiceAccount, collection: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::new();
        let tokens = TokenSource::new(http.clone(), account)?;

        Ok(Self {
            http,
            tokens,
            collection: collection.into(),
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_API,
            self.tokens.project_id()
        )
    }

    async fn list_all(&self, limit: usize) -> Result<Vec<Document>, AppError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{}/{}", self.documents_url(), self.collection))
            .query(&[("pageSize", limit.to_string())])
            .bearer_auth(token)
            .send()
            .await?;

        let response = check_status(response, "list").await?;
        let page: ListDocumentsResponse = response.json().await?;
        Ok(page.documents)
    }

    async fn query_by_user(&self, user: &str, limit: usize) -> Result<Vec<Document>, AppError> {
        let token = self.tokens.access_token().await?;
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "user" },
                        "op": "EQUAL",
                        "value": { "stringValue": user }
                    }
                },
                "limit": limit
            }
        });

        let response = self
            .http
            .post(format!("{}:runQuery", self.documents_url()))
            .bearer_auth(token)
            .json(&query)
            .send()
            .await?;

        let response = check_status(response, "query").await?;
        let items: Vec<RunQueryItem> = response.json().await?;
        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }
}

#[async_trait]
impl SubscriptionStore for FirestoreStore {
    async fn list(&self, selector: &Selector) -> Result<Vec<StoredSubscription>, AppError> {
        let documents = match selector {
            Selector::All => self.list_all(selector.limit()).await?,
            Selector::User(user) => self.query_by_user(user.as_str(), selector.limit()).await?,
        };

        tracing::debug!(selector = %selector, count = documents.len(), "Fetched subscriptions");
        Ok(documents.into_iter().map(to_stored_subscription).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .delete(format!("{}/{}/{}", self.documents_url(), self.collection, id))
            .bearer_auth(token)
            .send()
            .await?;

        check_status(response, "delete").await?;
        Ok(())
    }
}

async fn check_status(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Store(format!(
        "Firestore {} failed ({}): {}",
        operation, status, body
    )))
}

fn to_stored_subscription(document: Document) -> StoredSubscription {
    let id = document_id(&document.name).to_string();
    let fields = decode_fields(&document.fields);

    let subscription = fields
        .get("subscription")
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value::<PushSubscription>(v.clone()).ok());
    let user = fields
        .get("user")
        .and_then(Value::as_str)
        .map(str::to_string);

    StoredSubscription {
        id,
        subscription,
        user,
    }
}

/// Last path segment of a full document resource name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Flatten one Firestore typed value into plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner.clone(),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default();
            Value::Object(fields)
        }
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default();
            Value::Array(values)
        }
        "geoPointValue" => inner.clone(),
        other => {
            tracing::debug!(kind = other, "Unknown Firestore value type");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/pushSubscriptions/abc123",
            "fields": {
                "user": { "stringValue": "danna" },
                "subscription": { "mapValue": { "fields": {
                    "endpoint": { "stringValue": "https://fcm.googleapis.com/fcm/send/xyz" },
                    "expirationTime": { "nullValue": null },
                    "keys": { "mapValue": { "fields": {
                        "p256dh": { "stringValue": "BNc..." },
                        "auth": { "stringValue": "tBH..." }
                    }}}
                }}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_document_id_is_last_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/pushSubscriptions/abc"),
            "abc"
        );
        assert_eq!(document_id("abc"), "abc");
    }

    #[test]
    fn test_decode_scalar_values() {
        assert_eq!(decode_value(&json!({"integerValue": "42"})), json!(42));
        assert_eq!(decode_value(&json!({"doubleValue": 1.5})), json!(1.5));
        assert_eq!(decode_value(&json!({"booleanValue": true})), json!(true));
        assert_eq!(decode_value(&json!({"nullValue": null})), Value::Null);
        assert_eq!(
            decode_value(&json!({"arrayValue": {"values": [{"stringValue": "a"}]}})),
            json!(["a"])
        );
        assert_eq!(decode_value(&json!({"arrayValue": {}})), json!([]));
    }

    #[test]
    fn test_document_to_subscription() {
        let stored = to_stored_subscription(sample_document());
        assert_eq!(stored.id, "abc123");
        assert_eq!(stored.user.as_deref(), Some("danna"));

        let deliverable = stored.subscription.unwrap().deliverable().unwrap();
        assert_eq!(deliverable.endpoint, "https://fcm.googleapis.com/fcm/send/xyz");
        assert_eq!(deliverable.p256dh, "BNc...");
    }

    #[test]
    fn test_document_without_subscription_field() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/demo/databases/(default)/documents/pushSubscriptions/empty",
            "fields": { "user": { "stringValue": "diego" } }
        }))
        .unwrap();

        let stored = to_stored_subscription(document);
        assert_eq!(stored.id, "empty");
        assert!(stored.subscription.is_none());
    }
}
