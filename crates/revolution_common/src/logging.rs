//! Logging utilities for the Revolution services.
//!
//! Every crate logs through `tracing` macros; this module only owns subscriber
//! setup.

use revolution_config::LoggingConfig;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives still apply; the level is added for the `revolution` targets.
pub fn init_with_level(level: Level) {
    let filter = build_filter(level);

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// When `directory` is set, a daily rolling file layer is added next to stdout.
/// The returned guard must be kept alive for the file writer to flush.
pub fn init_with_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = config
        .level
        .as_deref()
        .and_then(|raw| Level::from_str(raw).ok())
        .unwrap_or(Level::INFO);

    let Some(directory) = config.directory.as_deref() else {
        init_with_level(level);
        return None;
    };

    let prefix = config.file_prefix.as_deref().unwrap_or("revolution.log");
    let appender = tracing_appender::rolling::daily(directory, prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(build_filter(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {} (files in {})", level, directory);
    }
    Some(guard)
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("revolution={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
