//! Logging setup
//!
//! Installs the global `tracing` subscriber shared by the server and the
//! Lambda binaries.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogFormat;

/// Build the level filter: `RUST_LOG` wins over the configured level
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize the tracing subscriber with the given level and format.
///
/// Lambda binaries pass `ansi = false`; CloudWatch shows escape codes raw.
pub fn init_tracing(log_level: &str, format: LogFormat, ansi: bool) -> Result<()> {
    let filter = env_filter(log_level);

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_ansi(ansi)
            .with_target(false)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("Failed to install tracing subscriber")
}
