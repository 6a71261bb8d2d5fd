//! Logging Module
//!
//! File-based tracing setup. The TUI owns the terminal, so log output always
//! goes to files under the local data dir (or a custom dir); stderr is never
//! written while the interface is up.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name prefix; tracing-appender adds the date suffix
const LOG_FILE_PREFIX: &str = "churnwatch.log";

/// Logging setup options
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level string for the default filter (e.g. "info", "debug")
    pub level: String,
    /// Force debug level regardless of configured level
    pub debug_mode: bool,
    /// Directory for log files
    pub log_dir: PathBuf,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            level: "info".to_string(),
            debug_mode: false,
            log_dir: default_log_dir(),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Default log directory: ~/.local/share/churnwatch/logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("churnwatch")
        .join("logs")
}

/// Initialize the global tracing subscriber with a daily-rolling file writer.
/// The returned guard must be held for the lifetime of the process or tail
/// log lines are lost.
pub fn init_logging(config: LogConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let level = if config.debug_mode {
        "debug"
    } else {
        config.level.as_str()
    };
    // RUST_LOG wins when set; otherwise scope the level to this crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("churnwatch={level}")));

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!(dir = ?config.log_dir, level, "logging initialized");
    Ok(guard)
}

/// Remove log files older than `keep_days`. Returns how many were removed.
pub fn cleanup_old_logs(keep_days: u64) -> Result<usize> {
    let log_dir = default_log_dir();
    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = std::time::SystemTime::now()
        - std::time::Duration::from_secs(keep_days * 24 * 60 * 60);
    let mut removed = 0;

    for entry in std::fs::read_dir(&log_dir).context("Failed to read log directory")? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }
        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified
            && modified < cutoff
            && std::fs::remove_file(&path).is_ok()
        {
            removed += 1;
        }
    }

    Ok(removed)
}
