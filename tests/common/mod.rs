#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{Map, Value};
use tower::ServiceExt;

use stethoscope_api::auth::{AuthError, TokenVerifier};
use stethoscope_api::store::MemoryStore;
use stethoscope_api::{app, AppState};

pub const TEST_UID: &str = "123456789";
pub const GOOD_TOKEN: &str = "good-token";

/// Stand-in for the identity provider: accepts exactly one token and always
/// resolves it to TEST_UID.
pub struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        if token == GOOD_TOKEN {
            Ok(TEST_UID.to_string())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// Build the full router over an in-memory store, returning the store handle
/// so tests can seed and inspect documents directly.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), Arc::new(StaticVerifier));
    (app(state), store)
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("test doc must be an object")
}

/// Drive one request through the router and decode the JSON response.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}
