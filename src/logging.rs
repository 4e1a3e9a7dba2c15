//! Tracing setup: stdout plus one `auralearn_<launch time>.log` per launch.
//!
//! Log files live under `<app root>/logs`; only the newest launches are kept.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

const KEEP_LAUNCHES: usize = 10;
const LOG_PREFIX: &str = "auralearn_";
const LOG_SUFFIX: &str = ".log";
const DEFAULT_FILTER: &str = "info,ureq=warn,rustls=warn";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Reasons logging could not be installed; the app keeps running without it.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No usable log directory: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Log file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("A global tracing subscriber is already installed: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init() -> Result<(), LoggingError> {
    if FILE_GUARD.get().is_some() {
        return Ok(());
    }
    let dir = app_dirs::logs_dir()?;
    let file_name = launch_file_name(launch_time())?;
    let pruned = prune_launch_logs(&dir, KEEP_LAUNCHES - 1)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&dir, &file_name));
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    );
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(fmt::layer().with_timer(timer.clone()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = FILE_GUARD.set(guard);

    tracing::info!(
        file = %dir.join(&file_name).display(),
        pruned,
        "Logging initialized"
    );
    Ok(())
}

fn launch_time() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn launch_file_name(at: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{LOG_PREFIX}{}{LOG_SUFFIX}", at.format(STAMP)?))
}

/// Delete the oldest launch logs so at most `keep` remain; returns how many went.
///
/// Launch names embed a sortable timestamp, so name order is age order. Files
/// without the launch prefix are left alone.
fn prune_launch_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| LoggingError::Io { path, source }
    };
    let mut launches: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX))
        })
        .filter(|path| path.is_file())
        .collect();
    launches.sort();
    let excess = launches.len().saturating_sub(keep);
    for path in &launches[..excess] {
        fs::remove_file(path).map_err(io_err(path.as_path()))?;
    }
    Ok(excess)
}
