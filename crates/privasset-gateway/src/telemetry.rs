//! Tracing subscriber setup.
//!
//! Honors `RUST_LOG`; defaults to `info`. JSON output is meant for log
//! shippers, plain output for terminals.

use privasset_types::{GatewayConfig, PrivassetError, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &GatewayConfig) -> Result<()> {
    let json = config.log_json;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| PrivassetError::Configuration(format!("log filter: {e}")))?;

    let installed = if json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };
    installed.map_err(|e| PrivassetError::Configuration(format!("tracing init: {e}")))?;

    tracing::info!(
        engine = privasset_types::constants::ENGINE_NAME,
        version = privasset_types::constants::VERSION,
        json,
        "Tracing initialized"
    );
    Ok(())
}
