//! HTTP client for the upstream service.
//!
//! # Responsibilities
//! - POST the inbound JSON payload to the configured URL
//! - Enforce connect and total timeouts
//! - Classify the outcome into a JSON value or an [`UpstreamError`]

use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::upstream::error::{describe, UpstreamError};

/// Upstream client wrapper.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let url = Url::parse(&config.url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .no_proxy()
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self {
            http,
            url,
            timeout: config.timeout(),
        })
    }

    /// Forward `payload` and return the upstream's JSON response.
    pub async fn forward(&self, payload: &Value) -> Result<Value, UpstreamError> {
        // `.json()` sets `Content-Type: application/json`
        let response = self
            .http
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(self.timeout)
            } else {
                UpstreamError::Malformed(describe(&e))
            }
        })?;

        tracing::debug!(
            status = %status,
            bytes = bytes.len(),
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: error_body(&bytes),
            });
        }

        // An empty success body is relayed as an empty JSON string.
        if bytes.is_empty() {
            return Ok(Value::String(String::new()));
        }

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Malformed(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Unreachable(err)
        }
    }
}

/// Upstream error payload: JSON when it parses, raw text otherwise.
///
/// Empty bodies and falsy JSON (`null`, `false`, `0`, `""`) carry no
/// payload, so the caller gets the error description instead.
fn error_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) if is_falsy(&value) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
