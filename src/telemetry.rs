//! Tracing subscriber setup.
//!
//! Diagnostics are written to stderr so stdout stays reserved for the Dockerfile or the
//! docker run command. Filter precedence: AGENT_RUN_LOG, then RUST_LOG, then a default
//! of "warn" ("debug" when the CLI asked for debug output).

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

fn env_filter_directive(debug: bool) -> String {
    ["AGENT_RUN_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| if debug { "debug" } else { "warn" }.to_string())
}

/// Install the global subscriber once. Returns false when it was already installed
/// (by us or by someone else).
pub fn telemetry_init(debug: bool) -> bool {
    if INIT.get().is_some() {
        return false;
    }

    let directive = env_filter_directive(debug);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("agent-run: tracing init skipped (global subscriber already set)");
        return false;
    }

    let _ = INIT.set(());
    true
}
