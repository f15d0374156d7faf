//! Logging and tracing setup.
//!
//! Human-readable events go to stderr (stdout is reserved for command output).
//! When a log file or directory is configured, events are also written as
//! JSON lines through a non-blocking appender.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming an exact log file.
pub const LOG_PATH_ENV: &str = "SYLLABIC_LOG_PATH";

/// Environment variable naming a log directory (daily-rotated files).
pub const LOG_DIR_ENV: &str = "SYLLABIC_LOG_DIR";

/// Rotated log file names inside a log directory: `syllabic.<date>.jsonl`.
const LOG_FILE_PREFIX: &str = "syllabic";
const LOG_FILE_SUFFIX: &str = "jsonl";

/// Where, if anywhere, to write the JSONL log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file; takes precedence over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for daily-rotated log files.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read `SYLLABIC_LOG_PATH` and `SYLLABIC_LOG_DIR`.
    pub fn from_env() -> Self {
        Self {
            log_path: env_path(LOG_PATH_ENV),
            log_dir: env_path(LOG_DIR_ENV),
        }
    }

    /// Like [`Self::from_env`], falling back to the configured `log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let mut config = Self::from_env();
        if config.log_dir.is_none() {
            config.log_dir = config_log_dir;
        }
        config
    }

    /// Whether any file output is configured.
    pub const fn file_logging_enabled(&self) -> bool {
        self.log_path.is_some() || self.log_dir.is_some()
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Level directive implied by the CLI flags. `-q` beats `-v`.
pub fn level_directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Build the event filter: `RUST_LOG` if set and valid, else the flag/config level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = level_directive(quiet, verbose, config_level);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Keeps the background log writer alive; drop it last to flush.
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the log directory cannot be created or a subscriber is already set.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let (file_layer, file_guard) = match file_appender(config)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
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

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}

fn file_appender(config: &ObservabilityConfig) -> anyhow::Result<Option<RollingFileAppender>> {
    let (dir, builder) = if let Some(ref path) = config.log_path {
        let Some(name) = path.file_name() else {
            anyhow::bail!("log path has no file name: {}", path.display());
        };
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let builder = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(name.to_string_lossy().into_owned());
        (dir, builder)
    } else if let Some(ref dir) = config.log_dir {
        let builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX);
        (dir.as_path(), builder)
    } else {
        return Ok(None);
    };

    ensure_dir(dir)?;
    let appender = builder
        .build(dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))?;
    Ok(Some(appender))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}
