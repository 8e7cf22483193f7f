//! Telemetry setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,centerline=debug";

/// Installs the global subscriber. `format` is `json` or `pretty`; anything
/// else falls back to the compact default formatter.
pub fn init_telemetry(format: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        "json" => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init(),
        "pretty" => registry.with(fmt::layer().pretty().with_target(true)).init(),
        _ => registry.with(fmt::layer().with_target(true)).init(),
    }
}
