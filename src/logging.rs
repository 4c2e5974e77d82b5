use crate::config::LogConfig;
use crate::error::LogInitError;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the process-wide subscriber that appends to `config.file`.
///
/// Call once at startup and hold the returned guard until exit so buffered
/// lines are flushed. A second call leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard, LogInitError> {
    let dir = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| LogInitError::Dir {
        path: dir.to_path_buf(),
        source,
    })?;
    let name = config
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "get_incident_card.log".to_string());

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|source| LogInitError::File {
            path: config.file.clone(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let file_layer = fmt::layer().with_ansi(false).with_writer(writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
    Ok(guard)
}
