//! Log sink setup.
//!
//! Events go to stderr and to a per-start log file. File lines look like
//! `2024-05-01 03:00:00 [Information] Cleanup started` with any structured
//! fields appended after the message. The file writer sits behind a mutex so
//! concurrent events are appended whole, one line at a time.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FOLDER_NAME: &str = "CleanupWindowsService";

/// `<timestamp> [<Level>] <message>` line format for the log file.
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} [{}] ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        "Error"
    } else if *level == Level::WARN {
        "Warning"
    } else if *level == Level::INFO {
        "Information"
    } else if *level == Level::DEBUG {
        "Debug"
    } else {
        "Trace"
    }
}

/// Documents\CleanupWindowsService under the current user's profile.
pub fn default_log_directory() -> Option<PathBuf> {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
        .or_else(|| std::env::var_os("USERPROFILE").map(|p| PathBuf::from(p).join("Documents")))
        .map(|dir| dir.join(LOG_FOLDER_NAME))
}

/// Create the log folder and open a fresh `LoggingResults_<timestamp>.txt` in it.
pub fn open_log_file(directory: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let file_name = format!("LoggingResults_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
    let path = directory.join(file_name);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Ok((file, path))
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// If the log file cannot be opened the daemon keeps running with console
/// output only.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let file = match config.directory.clone().or_else(default_log_directory) {
        Some(directory) => open_log_file(&directory).map(Some),
        None => Ok(None),
    };

    let (file_layer, log_path, file_error) = match file {
        Ok(Some((file, path))) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LineFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Some(path),
            None,
        ),
        Ok(None) => (None, None, None),
        Err(err) => (None, None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    if let Some(err) = file_error {
        tracing::warn!("Logging to console only: {err:#}");
    }

    Ok(log_path)
}
