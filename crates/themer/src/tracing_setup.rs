//! Tracing subscriber setup for the command-line front end.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a `-v` count: warn, info, debug, then trace.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build a stderr subscriber. `RUST_LOG` wins over `verbosity` when set.
pub fn build_subscriber(verbosity: u8) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

/// Install the subscriber globally. A subscriber that is already set is kept.
pub fn init_global(verbosity: u8) {
    let _ = build_subscriber(verbosity).try_init();
}
