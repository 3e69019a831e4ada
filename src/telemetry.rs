//! Tracing subscriber setup shared by the server and admin binaries.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. `format` is `text` or `json`.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already set.
pub fn init(default_level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log filter '{default_level}'"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if format == "json" {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
