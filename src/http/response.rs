//! Response shaping for forwarding failures.
//!
//! Successful upstream bodies are relayed untouched as `Json<Value>`; every
//! [`UpstreamError`] becomes the same JSON envelope:
//!
//! ```text
//! { "error": "Failed to connect to Rust server", "details": <upstream body | description> }
//! ```
//!
//! with the upstream's status when it sent one, else 500.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::upstream::UpstreamError;

/// Fixed `error` text of the failure envelope.
pub const FORWARD_FAILED: &str = "Failed to connect to Rust server";

/// Body returned to the caller when forwarding fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: &'static str,
    pub details: Value,
}

impl From<&UpstreamError> for ErrorEnvelope {
    fn from(err: &UpstreamError) -> Self {
        Self {
            error: FORWARD_FAILED,
            details: err.details(),
        }
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorEnvelope::from(&self))).into_response()
    }
}
