//! Tracing setup. The TUI owns stdout, so interactive sessions log to a
//! rolling file; the one-shot `convert` command logs to stderr.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "songbook.log";

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("LOG_LEVEL")
        .from_env_lossy()
}

/// Log to a daily file under `log_dir`. Keep the returned guard alive for the
/// whole session or buffered lines are lost on exit.
pub fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(env_filter())
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(guard)
}

pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .try_init()
        .context("failed to install log subscriber")
}
