//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr. When a log location is configured,
//! events are also written as JSON lines through a non-blocking file writer.
//! The returned guard flushes that writer and must live until exit.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "UNJARGON_LOG_PATH";
const LOG_DIR_ENV: &str = "UNJARGON_LOG_DIR";
const LOG_FILE_NAME: &str = "unjargon.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file.
    pub log_path: Option<PathBuf>,
    /// Directory for `unjargon.jsonl`.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let from_env = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            log_path: from_env(LOG_PATH_ENV),
            log_dir: from_env(LOG_DIR_ENV).or(config_log_dir),
        }
    }

    /// Directory and file name for the JSON log, if file logging is on.
    fn file_target(&self) -> Option<(PathBuf, String)> {
        if let Some(path) = &self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            let name = path
                .file_name()
                .map_or_else(|| LOG_FILE_NAME.to_string(), |n| n.to_string_lossy().into_owned());
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), LOG_FILE_NAME.to_string()))
    }
}

/// Build the level filter: `RUST_LOG` wins, then `-q`/`-v`, then config.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match config.file_target() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, &name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global subscriber is already installed")?;
    Ok(guard)
}
