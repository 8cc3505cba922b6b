//! Logging initialization for the console client.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable consulted for a log filter before the configured level.
const LOG_ENV_VAR: &str = "ATRIUM_LOG";

/// Initialize the logging system for the console client.
///
/// Sets up tracing with:
/// - A compact fmt layer writing to stderr
/// - Log filter from the `ATRIUM_LOG` env var or the provided default level
///
/// Calling this more than once is harmless; later calls are ignored.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
