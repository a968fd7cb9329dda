use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";
/// Daily files are named `leadagent.YYYY-MM-DD.log`.
pub const LOG_FILE_PREFIX: &str = "leadagent";
pub const LOG_FILE_SUFFIX: &str = "log";
/// One file per day, so this is the retention in days.
pub const LOG_RETENTION_FILES: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `leadagent=debug`.
    pub level: String,
    /// Directory for the rotating log file; `None` logs to stdout only.
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// `--verbose` forces `debug`; otherwise `LOG_LEVEL` decides. `LOG_DIR`
    /// moves the log files, and an empty `LOG_DIR` turns file logging off.
    pub fn from_env(verbose: bool) -> Self {
        let env_level = std::env::var("LOG_LEVEL").ok();
        let log_dir = match std::env::var("LOG_DIR") {
            Ok(dir) if dir.trim().is_empty() => None,
            Ok(dir) => Some(PathBuf::from(dir)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        };

        Self {
            level: level_directive(verbose, env_level.as_deref()),
            log_dir,
        }
    }
}

/// Accepts `EnvFilter` directives as well as the `WARNING`/`CRITICAL` names
/// other logging stacks use.
pub fn level_directive(verbose: bool, env_level: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }

    match env_level.map(str::trim).filter(|level| !level.is_empty()) {
        Some(level) => match level.to_ascii_lowercase().as_str() {
            "warning" => "warn".to_string(),
            "critical" | "fatal" => "error".to_string(),
            other => other.to_string(),
        },
        None => DEFAULT_LOG_LEVEL.to_string(),
    }
}

/// Daily-rotating appender that keeps the newest [`LOG_RETENTION_FILES`]
/// files and deletes older ones on rotation.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(LOG_RETENTION_FILES)
        .build(dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))
}

/// Install the global subscriber: stdout plus, when configured, the rotating
/// file. Keep the returned guard alive until exit so buffered lines are
/// flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid LOG_LEVEL '{}'", config.level))?;

    let stdout_layer = fmt::layer().with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(guard)
}
