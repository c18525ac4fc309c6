//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, trace, body limit)
//!     → request.rs (assign / propagate x-request-id)
//!     → server.rs forward_update (POST /update)
//!     → upstream::UpstreamClient
//!     → response.rs (upstream JSON, or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id_layers, MakeRelayRequestId, X_REQUEST_ID};
pub use response::{ErrorEnvelope, FORWARD_FAILED};
pub use server::{AppState, RelayServer};
