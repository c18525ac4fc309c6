//! Update relay library.
//!
//! Accepts `POST /update` with a JSON body, forwards it unchanged to the
//! upstream service and relays the upstream's JSON answer, or a
//! `{ "error", "details" }` envelope when the upstream call fails.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use error::RelayError;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use upstream::{UpstreamClient, UpstreamError};
