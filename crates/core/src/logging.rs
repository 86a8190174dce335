//! Logging setup on the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `MURMUR_LOG`: Filter directive (like `RUST_LOG`), e.g., `murmur_core=debug`
//! - `MURMUR_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `MURMUR_LOG_DIR`: Directory for file logs (default `~/.murmur/logs`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = true
//! ```
//!
//! The terminal UI disables stderr output with [`LoggingConfig::without_stderr`]
//! so log lines never land on the alternate screen. With `[logging.file]`
//! disabled as well it installs a subscriber with no output layers.

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Runtime logging settings, built from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter when no environment override is present.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
    /// Emit events on stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), file: None, stderr: true }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        Self {
            level: config.level,
            format: LogFormat::parse_str(&config.format).unwrap_or_default(),
            file: if config.file.enabled { Some(config.file) } else { None },
            stderr: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Drop the stderr layer (full-screen terminal UIs).
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        self
    }

    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("MURMUR_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("MURMUR_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if self.format == LogFormat::Pretty && !Self::is_tty() { LogFormat::Compact } else { self.format }
    }

    fn log_dir(&self) -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("MURMUR_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        if let Some(dir) = self.file.as_ref().and_then(|f| f.directory.clone()) {
            return Ok(dir);
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".murmur").join("logs"))
    }
}

/// Install the global tracing subscriber.
///
/// Returns the file writer guard when file logging is enabled; keep it alive
/// for the lifetime of the process or buffered lines are lost on exit.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let env_filter = config.build_env_filter();
    let format = config.detect_format();

    let stderr_layer = config.stderr.then(|| match format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).boxed(),
    });

    let (file_layer, guard) = match &config.file {
        Some(_) => {
            let log_dir = config.log_dir()?;
            std::fs::create_dir_all(&log_dir)
                .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "murmur.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}

/// Shorten user or service text for log fields.
pub fn preview(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }

    let mut truncated = content.chars().take(max_chars).collect::<String>();
    truncated.push_str(&format!("... ({} total chars)", total));
    truncated
}
