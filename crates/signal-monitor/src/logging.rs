//! Logging setup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use signal_config::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILE: &str = "signal-agent.log";

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// When a log file is configured the returned guard must be held until
/// exit so buffered lines are flushed.
pub fn setup_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (file_layer, guard) = match &settings.file {
        Some(path) => {
            let (dir, name) = split_log_path(path);
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let installed = if settings.is_json() {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };
    if let Err(e) = installed {
        eprintln!("logging already initialised: {e}");
    }

    guard
}

/// Directory and file-name prefix for the rolling appender.
fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let name = path
        .file_name()
        .map_or_else(|| OsString::from(DEFAULT_LOG_FILE), |n| n.to_os_string());
    (dir, name)
}
