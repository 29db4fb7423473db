//! Application logging functionality
//!
//! Logs go to stderr so the pipeline's progress never mixes with anything a
//! caller pipes from stdout.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
#[cfg(debug_assertions)]
const DEFAULT_FILTER: &str = "iconforge=debug";
#[cfg(not(debug_assertions))]
const DEFAULT_FILTER: &str = "iconforge=info";

/// Install the global `tracing` subscriber
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
