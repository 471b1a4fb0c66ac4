//! Structured logging for the CLI
//!
//! - JSON formatted logs to a rotating file
//! - Human-readable console output on stderr (stdout carries results)
//! - Size-based rotation (10MB per file) plus daily rotation

use std::path::Path;

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "docfetch_cli=info,docfetch=debug,docfetch_core=debug";

/// Initialize logging to `log_dir` and stderr
///
/// Returns a guard that must be kept alive to ensure logs are flushed
pub fn init_telemetry(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Format: docfetch.log, rotated daily or at 10MB, whichever comes first
    let file_appender = RollingFileAppender::new(
        log_dir.join("docfetch.log"),
        RollingConditionBasic::new()
            .daily()
            .max_size(10 * 1024 * 1024), // 10 MB
        9,
    )?;

    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG overrides the default filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_current_span(true)
        .with_target(true)
        .with_thread_ids(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::debug!("Logging to {:?}", log_dir);

    Ok(guard)
}
