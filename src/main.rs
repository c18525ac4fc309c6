//! Update relay binary.
//!
//! ```text
//!   Caller ── POST /update ──▶ relay :4000 ── POST /update ──▶ upstream 127.0.0.1:3000
//!   Caller ◀── JSON / error ── relay      ◀── JSON / status ── upstream
//! ```
//!
//! Runs with the built-in defaults; there are no flags.

use tokio::net::TcpListener;

use update_relay::config::{validate_config, ConfigError};
use update_relay::lifecycle::{wait_for_signal, Shutdown};
use update_relay::{observability, RelayConfig, RelayError, RelayServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::default();

    observability::logging::init(&config.observability);

    tracing::info!("update-relay v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        return Err(RelayError::Config(ConfigError::Validation(errors)).into());
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(RelayError::Io)?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Relay server running on http://{}", local_addr);

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config).map_err(RelayError::Upstream)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
