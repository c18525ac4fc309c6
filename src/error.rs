//! Startup errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::upstream::UpstreamError;

/// Anything that can stop the relay from starting or serving.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
