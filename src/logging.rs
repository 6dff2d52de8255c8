use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
pub fn init_logging() {
    // Ensure logs directory exists
    let _ = fs::create_dir_all("logs");

    // Daily-rotated JSON file, written off the request path
    let file_appender = tracing_appender::rolling::daily("logs", "registration_view.log");
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Human-readable console output goes to stderr so `confirm --json` stays parseable
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Respect RUST_LOG if set; otherwise info for our crate, warn for dependencies
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("registration_view=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // We need to keep the guard in scope to ensure logs are flushed on exit
    std::mem::forget(_guard);
}
