//! Structured logging system using tracing crate
//!
//! ## Log Format Options
//!
//! The output format is controlled by the `LOG_FORMAT` environment variable or
//! the `[logging]` section of the config file:
//!
//! - `json` - Structured JSON format for production and log aggregation systems
//! - `pretty` - Human-readable format with colors and indentation for development
//! - `compact` - Terminal-friendly format with colors but minimal spacing
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: Log level (ERROR, WARN, INFO, DEBUG, TRACE)
//! - `LOG_FORMAT`: Output format (json, pretty, compact)
//! - `LOG_SPANS`: Include span events (true/false)
//! - `RUST_LOG`: Override log filtering (follows env_logger format)
//!
//! Environment variables win over the config file, which wins over the defaults
//! (INFO, json, no spans).
//!
//! ## Examples
//!
//! ```bash
//! LOG_FORMAT=pretty LOG_LEVEL=DEBUG agent-schema validate --kind query query.json
//! ```

use crate::config::LoggingSection;
use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for structured logging (machine-readable)
    Json,
    /// Pretty format with colors and indentation (human-readable)
    Pretty,
    /// Compact format with colors but minimal spacing (terminal-friendly)
    Compact,
}

impl LogFormat {
    /// Parse log format from string, falling back to JSON
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }
}

/// Parse a log level name, falling back to INFO
pub fn parse_level(s: &str) -> Level {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "INFO" => Level::INFO,
        "DEBUG" => Level::DEBUG,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Raise a level by `-v` count (one step per flag, capped at TRACE)
pub fn raise_level(level: Level, verbosity: u8) -> Level {
    const ORDER: [Level; 5] = [
        Level::ERROR,
        Level::WARN,
        Level::INFO,
        Level::DEBUG,
        Level::TRACE,
    ];
    let start = ORDER.iter().position(|l| *l == level).unwrap_or(2);
    ORDER[(start + verbosity as usize).min(ORDER.len() - 1)]
}

/// Fully resolved logging settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub include_spans: bool,
}

impl LogSettings {
    /// Resolve settings from a config section, letting `lookup` (normally the
    /// process environment) override each value
    pub fn resolve<F>(section: &LoggingSection, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL").unwrap_or_else(|| section.level.clone());
        let format = lookup("LOG_FORMAT").unwrap_or_else(|| section.format.clone());
        let include_spans = lookup("LOG_SPANS")
            .map(|v| v.trim().to_lowercase() == "true")
            .unwrap_or(section.spans);

        Self {
            level: parse_level(&level),
            format: LogFormat::parse(&format),
            include_spans,
        }
    }
}

/// Initialize logging with manual configuration
pub fn init_logging(level: Level, format: LogFormat, include_spans: bool) {
    let mut filter = EnvFilter::new(level.to_string());

    // Allow RUST_LOG to override
    if let Ok(rust_log) = env::var("RUST_LOG") {
        filter = EnvFilter::new(rust_log);
    }

    let span_events = if include_spans {
        fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE
    } else {
        fmt::format::FmtSpan::NONE
    };

    // Logs go to stderr so decoded payloads on stdout stay machine-readable
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(span_events);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_span_events(span_events);
            subscriber.with(fmt_layer).init();
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_ansi(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_span_events(span_events);
            subscriber.with(fmt_layer).init();
        }
    }
}

/// Initialize logging from the config section and environment, raised by `verbosity`
pub fn init_from_config(section: &LoggingSection, verbosity: u8) {
    let settings = LogSettings::resolve(section, |key| env::var(key).ok());
    init_logging(
        raise_level(settings.level, verbosity),
        settings.format,
        settings.include_spans,
    );
}

/// Initialize logging from environment variables only
pub fn init_default_logging() {
    init_from_config(&LoggingSection::default(), 0);
}

/// Create a payload handling span with contextual information
#[macro_export]
macro_rules! payload_span {
    ($($field:tt)*) => {
        tracing::info_span!("payload", $($field)*)
    };
}

pub use payload_span;
