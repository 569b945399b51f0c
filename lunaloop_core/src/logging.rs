//! Tracing setup for the `luna` binary and the engine's unit tests.
//!
//! `RUST_LOG` always takes precedence. Without it, events from the engine and
//! the binary are shown at the requested level and everything else at `warn`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose events follow the requested level
const APP_TARGETS: [&str; 2] = ["lunaloop_core", "luna"];

fn default_filter(level: &str) -> EnvFilter {
    let directives: Vec<String> = APP_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    EnvFilter::new(format!("warn,{}", directives.join(",")))
}

/// Verbose setup: saves, streak changes, badge unlocks and level-ups at `info`
pub fn init() {
    init_with_level("info")
}

/// Install a compact stderr subscriber with `level` for the app's own events
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Route engine events to the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(default_filter("debug"))
        .try_init();
}
