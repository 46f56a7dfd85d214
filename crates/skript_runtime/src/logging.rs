//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

static INIT: Once = Once::new();

/// Default filter directive for a verbosity level (number of `-v` flags).
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "skript_runtime=info,skript_parser=info,skript_stdlib=info,warn",
        2 => "skript_runtime=debug,skript_parser=debug,skript_stdlib=debug,info",
        _ => "trace",
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Only the first call has an effect.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);
        // Another subscriber may already be installed by an embedding program.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
