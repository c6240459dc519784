//! Logging setup for the CLI.
//!
//! Human-readable logs go to stderr. When a log file or directory is
//! configured, every event that passes the global filter is also written as
//! JSON Lines through a non-blocking appender. Stdout is never touched, so
//! `serve` can use it for protocol frames.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Explicit log file path.
const LOG_PATH_ENV: &str = "ZHI_LANG_COP_LOG_PATH";
/// Directory that receives `zhi-lang-cop.jsonl`.
const LOG_DIR_ENV: &str = "ZHI_LANG_COP_LOG_DIR";
const LOG_FILE_NAME: &str = "zhi-lang-cop.jsonl";

/// Where logs are written besides stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file, if any.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to
    /// `config_log_dir`.
    ///
    /// Precedence: `ZHI_LANG_COP_LOG_PATH`, then `ZHI_LANG_COP_LOG_DIR`,
    /// then the configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = log_path.or_else(|| env_dir.or(config_dir).map(|d| d.join(LOG_FILE_NAME)));
        Self { log_file }
    }
}

/// Global filter: `RUST_LOG` when set, otherwise derived from the flags and
/// the configured level.
pub fn env_filter(quiet: bool, verbose: u8, log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose, log_level)))
}

fn default_directive(quiet: bool, verbose: u8, log_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => log_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// How much of the filtered stream reaches the terminal.
///
/// The file layer records everything the global filter lets through; stderr
/// stays at warnings unless `-v` or `RUST_LOG` asks for more.
fn stderr_level(quiet: bool, verbose: u8, rust_log_set: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        _ if rust_log_set => LevelFilter::TRACE,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes the file writer.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
    quiet: bool,
    verbose: u8,
) -> anyhow::Result<Option<WorkerGuard>> {
    let rust_log_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_level(quiet, verbose, rust_log_set));

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            let file_name = path
                .file_name()
                .with_context(|| format!("log path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
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
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
