use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "deploy_mcp=info";

/// Install the global subscriber.
///
/// Output goes to stderr because stdout carries the protocol. `RUST_LOG`
/// overrides [`DEFAULT_FILTER`].
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
