/*!
 * Tracing
 * Subscriber setup for the simulator's structured events
 *
 * The library only emits events and spans; installing a subscriber is the
 * binary's job.
 */

use crate::core::limits::ENV_TRACE_JSON;
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PARTITION_SIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json_requested(std::env::var(ENV_TRACE_JSON).ok().as_deref()) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!("Tracing initialized");
    }
    installed
}

fn json_requested(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1") | Some("true"))
}
