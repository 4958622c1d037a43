//! Tracing initialization.
//!
//! One fmt layer to stderr, filtered by `RUST_LOG` when set and by the
//! configured level otherwise.

use crate::config::Settings;
use crate::error::{HandError, HandResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Call once, early in `main`.
pub fn init(settings: &Settings) -> HandResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(|e| HandError::Configuration(format!("invalid log_level: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| HandError::Configuration(format!("tracing already initialized: {e}")))?;
    Ok(())
}
