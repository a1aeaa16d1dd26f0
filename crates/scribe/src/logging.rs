//! # Logging Infrastructure
//!
//! Structured logging with tracing.
//!
//! Library crates only emit events; this module installs the subscriber for
//! the `scribe` binary. Logs go to stderr so command output on stdout stays
//! machine-readable, and optionally to a daily-rolled file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scribe::logging::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```
//!
//! ## From the configuration file
//!
//! ```
//! use scribe::logging::{LogConfig, LogFormat, LogLevel};
//! use scribe_core::config::LoggingConfig;
//!
//! let settings = LoggingConfig {
//!     level: "debug".into(),
//!     format: "json".into(),
//!     file: None,
//! };
//!
//! // No -v flags: the file decides.
//! let config = LogConfig::from_settings(&settings, 0).unwrap();
//! assert_eq!(config.level, LogLevel::Debug);
//! assert_eq!(config.format, LogFormat::Json);
//!
//! // -vvv wins over the file.
//! let config = LogConfig::from_settings(&settings, 3).unwrap();
//! assert_eq!(config.level, LogLevel::Trace);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use scribe_core::config::LoggingConfig;
use scribe_core::config_loader::expand_path;
use tracing::Level;
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error type for logging initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Failed to create log file or directory
    #[error("Failed to create log file: {0}")]
    FileCreation(String),
    /// Failed to initialize the subscriber
    #[error("Failed to initialize logging: {0}")]
    SubscriberInit(String),
    /// Invalid configuration
    #[error("Invalid log configuration: {0}")]
    InvalidConfig(String),
}

/// Minimum severity of logged events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// trace, debug, info, warn, error
    Trace,
    /// debug, info, warn, error
    Debug,
    /// info, warn, error
    Info,
    /// warn, error
    #[default]
    Warn,
    /// error only
    Error,
}

impl LogLevel {
    /// Convert to tracing Level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Get the string representation for env filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LogError::InvalidConfig(format!("unknown level {other:?}"))),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
    /// Single-line, human-readable.
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(LogError::InvalidConfig(format!("unknown format {other:?}"))),
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level.
    pub level: LogLevel,

    /// Line format for both stderr and the log file.
    pub format: LogFormat,

    /// Also write to this file, rolled daily. The parent directory is created
    /// if needed.
    pub file_path: Option<PathBuf>,
}

impl LogConfig {
    /// Build from the `[logging]` section. A non-zero `verbose` count
    /// overrides the configured level.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] for an unknown level or format, or a
    /// file path whose `~` cannot be expanded.
    pub fn from_settings(settings: &LoggingConfig, verbose: u8) -> Result<Self, LogError> {
        let level = if verbose > 0 {
            verbosity_to_level(verbose)
        } else {
            settings.level.parse()?
        };

        let file_path = settings
            .file
            .as_deref()
            .map(expand_path)
            .transpose()
            .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            level,
            format: settings.format.parse()?,
            file_path,
        })
    }
}

/// Keeps the file writer alive. Buffered lines are flushed on drop.
pub struct LogGuard {
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

/// Map `-v` occurrences to a level: `0 = warn`, `1 = info`, `2 = debug`,
/// `3+ = trace`.
#[must_use]
pub const fn verbosity_to_level(verbose: u8) -> LogLevel {
    match verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` is ignored; the level comes from `config` only.
///
/// # Errors
///
/// Returns [`LogError`] if:
/// - The log file directory cannot be created
/// - A subscriber is already installed
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = EnvFilter::try_new(config.level.as_str())
        .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

    let (file_writer, guard) = match &config.file_path {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir)
                .map_err(|e| LogError::FileCreation(format!("{}: {e}", dir.display())))?;

            let filename = path
                .file_name()
                .ok_or_else(|| LogError::InvalidConfig("Invalid log file name".to_string()))?;

            let appender = tracing_appender::rolling::daily(&dir, filename);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(file_writer.map(|writer| {
                tracing_fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
            }))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .with(file_writer.map(|writer| {
                tracing_fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
            }))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(file_writer.map(|writer| {
                tracing_fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
            }))
            .try_init(),
    };
    result.map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard { guard })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(verbosity_to_level(0), LogLevel::Warn);
        assert_eq!(verbosity_to_level(1), LogLevel::Info);
        assert_eq!(verbosity_to_level(2), LogLevel::Debug);
        assert_eq!(verbosity_to_level(3), LogLevel::Trace);
        assert_eq!(verbosity_to_level(u8::MAX), LogLevel::Trace);
    }

    #[test]
    fn test_level_parse_and_display() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Debug.as_tracing_level(), Level::DEBUG);
    }

    #[test]
    fn test_format_parse_and_display() {
        for format in [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(LogError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_settings_defaults() {
        let config = LogConfig::from_settings(&LoggingConfig::default(), 0).unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn test_from_settings_verbosity_wins() {
        let settings = LoggingConfig {
            level: "error".into(),
            ..LoggingConfig::default()
        };
        let config = LogConfig::from_settings(&settings, 2).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_from_settings_file_path() {
        let settings = LoggingConfig {
            file: Some("/tmp/scribe/scribe.log".into()),
            ..LoggingConfig::default()
        };
        let config = LogConfig::from_settings(&settings, 0).unwrap();
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/scribe/scribe.log")));
    }

    #[test]
    fn test_from_settings_rejects_unknown_level() {
        let settings = LoggingConfig {
            level: "chatty".into(),
            ..LoggingConfig::default()
        };
        assert!(LogConfig::from_settings(&settings, 0).is_err());
    }

    #[test]
    fn test_log_guard_debug() {
        let guard = LogGuard { guard: None };
        assert_eq!(format!("{guard:?}"), "LogGuard { has_file_guard: false }");
    }
}
