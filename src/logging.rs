//! Structured logging for the CLI.
//!
//! Diagnostics go to stderr by default so stdout carries only command output.
//! `RUST_LOG` overrides the environment-derived filter.

use anyhow::{Context, Result};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// `log_dir/<crate name>`, optionally rotated daily
    File,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub output: LogOutput,
    pub log_dir: PathBuf,
    pub rotate_daily: bool,
    /// `production` or `prod` selects JSON output and an `info` filter
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let format = if is_production(&environment) {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };

        Self {
            format,
            output: LogOutput::Stderr,
            log_dir: PathBuf::from("logs"),
            rotate_daily: true,
            environment,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `LOG_FORMAT`, `LOG_OUTPUT`, `LOG_DIR` and `LOG_ROTATION`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        match env::var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            Ok("json") => config.format = LogFormat::Json,
            Ok("pretty") => config.format = LogFormat::Pretty,
            _ => {}
        }
        match env::var("LOG_OUTPUT").map(|v| v.to_lowercase()).as_deref() {
            Ok("stdout") => config.output = LogOutput::Stdout,
            Ok("stderr") => config.output = LogOutput::Stderr,
            Ok("file") => config.output = LogOutput::File,
            _ => {}
        }
        if let Ok(dir) = env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Ok(rotation) = env::var("LOG_ROTATION") {
            config.rotate_daily =
                !matches!(rotation.to_lowercase().as_str(), "never" | "false" | "0");
        }

        config
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if is_production(&self.environment) {
                "info"
            } else {
                "debug"
            })
        })
    }

    fn writer(&self) -> Result<(NonBlocking, WorkerGuard)> {
        Ok(match self.output {
            LogOutput::Stdout => tracing_appender::non_blocking(io::stdout()),
            LogOutput::Stderr => tracing_appender::non_blocking(io::stderr()),
            LogOutput::File => {
                std::fs::create_dir_all(&self.log_dir).with_context(|| {
                    format!("failed to create log directory {}", self.log_dir.display())
                })?;
                let prefix = env!("CARGO_PKG_NAME");
                let appender = if self.rotate_daily {
                    tracing_appender::rolling::daily(&self.log_dir, prefix)
                } else {
                    tracing_appender::rolling::never(&self.log_dir, prefix)
                };
                tracing_appender::non_blocking(appender)
            }
        })
    }
}

fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

/// Install the global subscriber. Hold the returned guard until exit so
/// buffered events are flushed.
pub fn init_logging(config: LoggingConfig) -> Result<WorkerGuard> {
    let (writer, guard) = config.writer()?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_filter(config.filter())
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_ansi(config.output != LogOutput::File)
            .with_filter(config.filter())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("failed to install global tracing subscriber")?;

    tracing::debug!(
        environment = %config.environment,
        format = ?config.format,
        output = ?config.output,
        "logging initialized"
    );
    Ok(guard)
}

/// Span wrapping one validation call
pub fn validation_span(schema: &str) -> tracing::Span {
    tracing::debug_span!("validate", schema = schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            for key in ["ENVIRONMENT", "ENV", "LOG_FORMAT", "LOG_OUTPUT", "LOG_DIR", "LOG_ROTATION"] {
                env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults_log_pretty_to_stderr() {
        clear_env();
        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(config.rotate_daily);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("LOG_FORMAT", "JSON");
            env::set_var("LOG_OUTPUT", "file");
            env::set_var("LOG_DIR", "/tmp/skilltrack-logs");
            env::set_var("LOG_ROTATION", "never");
        }

        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::File);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/skilltrack-logs"));
        assert!(!config.rotate_daily);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_defaults_to_json() {
        clear_env();
        unsafe {
            env::set_var("ENV", "prod");
        }
        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Json);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_values_keep_defaults() {
        clear_env();
        unsafe {
            env::set_var("LOG_OUTPUT", "syslog");
        }
        assert_eq!(LoggingConfig::from_env().output, LogOutput::Stderr);
        clear_env();
    }
}
