//! Upstream subsystem: the single outbound call per request.
//!
//! # Data Flow
//! ```text
//! handler payload (serde_json::Value)
//!     → client.rs (POST application/json, bounded timeout)
//!     → 2xx JSON body                  → Ok(Value)
//!     → transport / status / decoding  → error.rs (UpstreamError)
//! ```
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by every request
//! - No retries: a call either fully succeeds or fully fails
//! - Errors keep the upstream status and body so the caller can see them

pub mod client;
pub mod error;

pub use client::UpstreamClient;
pub use error::UpstreamError;
