//! Log setup: one append-only file plus the console.
//!
//! Every record is written to both sinks as
//! `<timestamp> - [<LEVEL>] - <message>`. The subscriber is built as a value
//! so tests can install it for a scope instead of process-wide.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "file_organizer.log";

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub log_file: PathBuf,
    pub console: bool,
    pub debug: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            console: true,
            debug: false,
        }
    }
}

/// Formats records as `<timestamp> - [<LEVEL>] - <message>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

/// Level names as they appear in the log.
pub fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        write!(
            writer,
            "{} - [{}] - ",
            timestamp,
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Opens the log file for appending, creating its parent directory.
fn file_appender(log_file: &Path) -> Result<RollingFileAppender> {
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", log_file.display()))?;

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(&dir)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))
}

/// Build the dual-sink subscriber without installing it.
///
/// The returned guard flushes the file sink when dropped and must be held
/// for as long as the subscriber is in use.
pub fn build_subscriber(
    settings: &LogSettings,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(&settings.log_file)?);

    let default_level = if settings.debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = settings.console.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_writer(std::io::stderr)
            .with_ansi(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer);

    Ok((subscriber, guard))
}

/// Install the dual-sink subscriber for the whole process.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(settings: &LogSettings) -> Result<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(settings)?;
    subscriber
        .try_init()
        .context("Failed to install the global log subscriber")?;

    tracing::debug!(
        "Logging initialized: file={}, console={}, debug={}",
        settings.log_file.display(),
        settings.console,
        settings.debug
    );

    Ok(guard)
}
