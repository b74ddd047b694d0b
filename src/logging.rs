//! Tracing initialization.
//!
//! Logs go to stderr; stdout carries only the response.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CODESCOPE_LOG";

static INIT: Once = Once::new();

/// Initialize logging.
///
/// Reads `CODESCOPE_LOG` (e.g. `CODESCOPE_LOG=codescope_tools::graph=trace`).
/// Falls back to `codescope_tools=warn`, or `codescope_tools=debug` when
/// `verbose` is set. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose {
            "codescope_tools=debug"
        } else {
            "codescope_tools=warn"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
