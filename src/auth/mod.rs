use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config;

/// Errors from token verification
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid token")]
    MissingToken,

    #[error("Invalid ID token")]
    InvalidToken,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Verifies a bearer token with the external identity provider and returns
/// the provider-issued user id. The user id is opaque to this service; it is
/// only ever used as the key of the caller's user document.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Production verifier: POSTs the ID token to the identity provider's verify
/// endpoint and extracts the `uid` field from the response.
pub struct IdentityClient {
    http: reqwest::Client,
    verify_url: String,
}

impl IdentityClient {
    pub fn new(verify_url: impl Into<String>, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            verify_url: verify_url.into(),
        }
    }

    pub fn from_config() -> Self {
        let identity = &config::config().identity;
        Self::new(&identity.verify_url, identity.timeout_secs)
    }
}

#[async_trait]
impl TokenVerifier for IdentityClient {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let response = self
            .http
            .post(&self.verify_url)
            .json(&json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        body.get("uid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(AuthError::InvalidToken)
    }
}
