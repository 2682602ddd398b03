//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the causa tracing/logging system.
///
/// Reads the `CAUSA_LOG` environment variable for per-module log levels.
/// Format: `CAUSA_LOG=causa_identify=debug,causa_core=warn`
///
/// Falls back to `causa_core=info,causa_identify=info` if `CAUSA_LOG` is not set or is invalid.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CAUSA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("causa_core=info,causa_identify=info"));

        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
        tracing::debug!(version = crate::constants::VERSION, "tracing initialized");
    });
}
