//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! RelayConfig::default() (what the binary runs with)
//!   or TOML text
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed to RelayServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; the defaults are the fixed addresses the relay ships with
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, RelayConfig, SecurityConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
