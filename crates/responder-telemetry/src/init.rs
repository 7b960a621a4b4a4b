//! Tracing subscriber installation and logging configuration.
//!
//! # Design
//! - Centralises logging setup (fmt, JSON, or libtest-captured) with a single entry point.
//! - `init_logging_once` tolerates repeated calls from many test binaries and cases.
//! - The output format can be switched per run through [`ENV_LOG_FORMAT`].

use std::str::FromStr;

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Environment variable selecting the output format (`json`, `pretty`, `test`).
pub const ENV_LOG_FORMAT: &str = "RESPONDER_LOG_FORMAT";

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    install_fmt_subscriber(config)
}

/// Install the subscriber at most once per process.
///
/// Later calls are no-ops, and a subscriber installed by someone else is
/// left in place.
pub fn init_logging_once(config: &LoggingConfig) {
    let _ = INSTALLED.get_or_init(|| {
        let _ = init_logging(config);
    });
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Test,
        }
    }
}

impl LoggingConfig<'_> {
    /// Default level with the format taken from [`ENV_LOG_FORMAT`].
    ///
    /// An unset or unrecognised value keeps [`LogFormat::Test`], since no
    /// subscriber exists yet to report it.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            format: LogFormat::from_lookup(|key| std::env::var(key).ok()).unwrap_or_default(),
            ..Self::default()
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects to stdout.
    Json,
    /// Emit human-readable logs to stdout.
    Pretty,
    /// Emit human-readable logs through libtest's captured writer.
    #[default]
    Test,
}

impl LogFormat {
    /// Read the format from `lookup(ENV_LOG_FORMAT)`, defaulting to
    /// [`LogFormat::Test`] when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the value names no known format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_LOG_FORMAT).map_or(Ok(Self::Test), |raw| raw.parse())
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "test" => Ok(Self::Test),
            other => Err(anyhow!("unknown log format '{other}'")),
        }
    }
}

fn install_fmt_subscriber(config: &LoggingConfig) -> Result<()> {
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(false)
            .with_thread_ids(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .boxed(),
        LogFormat::Test => fmt::layer().with_test_writer().with_target(true).boxed(),
    };
    tracing_subscriber::registry()
        .with(layer)
        .with(build_env_filter(config.level))
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
