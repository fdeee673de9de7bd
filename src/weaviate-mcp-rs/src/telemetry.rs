//! Logging setup for binaries embedding the client
//!
//! Installs a `tracing` subscriber with:
//! - `RUST_LOG` filtering, falling back to the configured level
//! - human-readable or JSON lines on stderr

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weaviate_mcp_core::LogConfig;

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_telemetry(config: &LogConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()?;
    }

    tracing::info!(json = config.json, "Telemetry initialized");

    Ok(())
}
