//! OAuth2 access tokens for the subscription store.
//!
//! A service account signs a short-lived RS256 JWT assertion and exchanges it
//! at the account's `token_uri` for a bearer token. Tokens are cached until
//! shortly before they expire.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use pushbell_common::config::ServiceAccount;
use pushbell_common::error::AppError;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Assertion lifetime; Google rejects anything longer than one hour.
const ASSERTION_TTL_SECONDS: i64 = 3600;
/// Refresh this long before the reported expiry.
const REFRESH_MARGIN_SECONDS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: DateTime<Utc>,
}

pub struct TokenSource {
    http: reqwest::Client,
    account: ServiceAccount,
    key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    /// Fails with a configuration error if the private key is not a PEM RSA key.
    pub fn new(http: reqwest::Client, account: ServiceAccount) -> Result<Self, AppError> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes()).map_err(|e| {
            AppError::Config(format!(
                "FIREBASE_SERVICE_ACCOUNT private_key is not a valid RSA key: {}",
                e
            ))
        })?;

        Ok(Self {
            http,
            account,
            key,
            cached: Mutex::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    /// Return a valid bearer token, exchanging a new assertion if needed.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.refresh_at > now) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "token exchange failed ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "Obtained store access token");

        let refresh_at = now + Duration::seconds(token.expires_in - REFRESH_MARGIN_SECONDS);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at,
        });

        Ok(token.access_token)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = AssertionClaims {
            iss: &self.account.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.account.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_TTL_SECONDS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token assertion: {}", e)))
    }
}
