//! Process-wide tracing setup.
//!
//! The library itself only emits through `tracing` macros; this helper is
//! for applications that want a subscriber without wiring one themselves.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Call once at process
/// startup, before registering connections.
pub fn init(level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}
