//! Logging Infrastructure
//!
//! `tracing` subscriber setup for binaries and examples embedding the client.

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `level` (`RUST_LOG` overrides it).
pub fn init_logger(level: &str) {
    init_logger_with_filter(level, false);
}

/// Initialize the logger, optionally emitting JSON lines.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logger_with_filter(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
