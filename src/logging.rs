use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sets up tracing with a plain console layer and a daily-rotated JSON file
/// under `logs/`.
///
/// Returns the appender guard; the caller keeps it alive for the process
/// lifetime so buffered file output is flushed on exit.
#[must_use]
pub fn init_logging() -> WorkerGuard {
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "courseboard.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    // RUST_LOG still wins when set; default to info for this crate only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("courseboard=info".parse().unwrap()))
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
