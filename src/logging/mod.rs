//! Logging setup.
//!
//! The console always logs. In production, JSON file layers are added for
//! each configured destination: `error` receives ERROR events only,
//! `combined` receives everything that passes the level filter.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {message}")]
    InvalidLevel { level: String, message: String },
    #[error("cannot open log file {path}: {message}")]
    File { path: PathBuf, message: String },
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Log files that should be written for this configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTargets<'a> {
    pub error: Option<&'a Path>,
    pub combined: Option<&'a Path>,
}

/// Resolve which file destinations are active. Files are production-only and
/// need a filename.
pub fn file_targets(config: &LoggingConfig, production: bool) -> FileTargets<'_> {
    if !production {
        return FileTargets::default();
    }
    FileTargets {
        error: config.error.as_ref().and_then(|t| t.filename.as_deref()),
        combined: config.combined.as_ref().and_then(|t| t.filename.as_deref()),
    }
}

fn appender(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let file_error = |message: String| LoggingError::File {
        path: path.to_path_buf(),
        message,
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| file_error("missing file name".into()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| file_error(e.to_string()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| file_error(e.to_string()))
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails with
/// `AlreadyInitialized` if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig, production: bool) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidLevel {
            level: config.level.clone(),
            message: e.to_string(),
        })?,
    };

    let targets = file_targets(config, production);

    let error_layer = match targets.error {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(appender(path)?)
                .with_filter(LevelFilter::ERROR),
        ),
        None => None,
    };

    let combined_layer = match targets.combined {
        Some(path) => Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(appender(path)?),
        ),
        None => None,
    };

    let console_layer = fmt::layer().compact().with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(error_layer)
        .with(combined_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(
        production,
        error_file = ?targets.error,
        combined_file = ?targets.combined,
        "logging initialized"
    );
    Ok(())
}
