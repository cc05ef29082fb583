//! Logging infrastructure for Warden.
//!
//! [`init`] installs the process-wide `tracing` subscriber exactly once at
//! startup. Every line carries a timestamp, the level and the target (logger
//! name), so audit lines can be grepped by `warden::audit`.

pub mod capture;
pub mod spans;

use std::io;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Append-only log file, in addition to stderr.
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debugging detail.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Unexpected but handled.
    Warn,
    /// Failures.
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Directive understood by [`EnvFilter`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format.
    #[default]
    Pretty,
    /// Single-line text format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if std::env::var("WARDEN_LOG_LEVEL").is_err() {
            if let Some(l) = std::env::var("RUST_LOG").ok().as_deref().and_then(LogLevel::parse) {
                config.level = l;
            }
        }

        config.with_env_overrides()
    }

    /// Apply any `WARDEN_LOG_*` variables that are set on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("WARDEN_LOG_LEVEL") {
            if let Some(l) = LogLevel::parse(&level) {
                self.level = l;
            }
        }

        if let Ok(format) = std::env::var("WARDEN_LOG_FORMAT") {
            self.format = LogFormat::parse(&format).unwrap_or_default();
        }

        if let Ok(file_path) = std::env::var("WARDEN_LOG_FILE") {
            self.file_path = Some(PathBuf::from(file_path));
        }

        if let Ok(source_location) = std::env::var("WARDEN_LOG_SOURCE") {
            self.source_location =
                source_location.to_lowercase() == "true" || source_location == "1";
        }

        self
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the formatting layer for one output.
///
/// File output never carries ANSI colour codes.
fn format_layer<W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    }
}

/// Initialize logging with the given configuration.
///
/// `RUST_LOG`, when set to a valid filter, overrides the configured level.
/// Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let mut layers: Vec<BoxedLayer> = vec![format_layer(&config, io::stderr, true)];

    if let Some(file_path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        layers.push(format_layer(&config, std::sync::Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    /// The log file could not be opened.
    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("invalid"), None);
    }

    #[test]
    fn test_log_level_from() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(!config.source_location);
    }

    // Only this test touches the WARDEN_LOG_* variables.
    #[test]
    fn test_config_from_env() {
        let keys = ["WARDEN_LOG_LEVEL", "WARDEN_LOG_FORMAT", "WARDEN_LOG_FILE", "WARDEN_LOG_SOURCE"];
        let saved: Vec<_> = keys.into_iter().map(|key| (key, env::var(key).ok())).collect();

        for key in keys {
            env::remove_var(key);
        }
        let base = LogConfig {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: Some(PathBuf::from("/var/log/warden.log")),
            source_location: false,
        };
        let unchanged = base.clone().with_env_overrides();
        assert_eq!(unchanged.level, LogLevel::Warn);
        assert_eq!(unchanged.format, LogFormat::Compact);
        assert_eq!(unchanged.file_path, base.file_path);

        env::set_var("WARDEN_LOG_LEVEL", "debug");
        env::set_var("WARDEN_LOG_FORMAT", "json");
        env::set_var("WARDEN_LOG_FILE", "/tmp/warden-test.log");
        env::set_var("WARDEN_LOG_SOURCE", "1");

        let config = LogConfig::from_env();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path.unwrap(), PathBuf::from("/tmp/warden-test.log"));
        assert!(config.source_location);

        let overridden = base.with_env_overrides();
        assert_eq!(overridden.level, LogLevel::Debug);
        assert_eq!(overridden.format, LogFormat::Json);
        assert_eq!(overridden.file_path.unwrap(), PathBuf::from("/tmp/warden-test.log"));

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
