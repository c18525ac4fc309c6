//! Observability subsystem.
//!
//! Structured logging via `tracing`. Each request runs inside a span that
//! carries its method, URI and `x-request-id`, so handler events (inbound
//! payload, upstream response or error) are correlated automatically.

pub mod logging;
