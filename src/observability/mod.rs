//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "topicgraph=info";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// `default_directive` applies when `RUST_LOG` is unset or invalid. Logs go
/// to stderr so JSON on stdout stays clean. Subsequent calls are silently
/// ignored by `tracing_subscriber`.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
