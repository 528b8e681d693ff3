//! Structured logging and the public error boundary

mod entry;
mod service;

pub use entry::{LogEntry, LogLevel};
pub use service::{LogService, OperationTimer, DEFAULT_RETENTION};

/// Install a `tracing` subscriber honoring `RUST_LOG`, for embedders and tests.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
