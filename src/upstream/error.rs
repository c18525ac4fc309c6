//! Upstream failure taxonomy.

use reqwest::StatusCode;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while forwarding to the upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection-level failure (refused, reset, DNS, ...).
    #[error("upstream unreachable: {}", describe(.0))]
    Unreachable(#[source] reqwest::Error),

    /// The upstream call did not complete in time.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream answered with a non-success status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },

    /// A success response whose body is not JSON.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// Status reported to the original caller: the upstream's own status
    /// when it sent one, else 500.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Status { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The upstream's error payload if it sent one, otherwise a description.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status {
                body: Some(body), ..
            } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// Render an error with its whole source chain, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
