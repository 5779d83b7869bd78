//! Logging bootstrap for applications embedding pollers
//!
//! The poller itself only emits `tracing` events under the `poller` target.
//! Applications that want to see them can install a subscriber through this
//! module; everything outside the poller crates is kept at `warn`.

use tracing_subscriber::EnvFilter;

/// Crates whose events the default filters let through
const POLLER_TARGETS: [&str; 2] = ["poller", "poll_strategy"];

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output, run lifecycle at `info`
    Development,
    /// Every tick at `debug`, with source locations
    Debug,
}

impl LoggingMode {
    /// Parse a `POLLER_LOG_MODE` value. Unknown values mean `Silent`.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("development") => LoggingMode::Development,
            Some(v) if v.eq_ignore_ascii_case("debug") => LoggingMode::Debug,
            _ => LoggingMode::Silent,
        }
    }

    /// Level applied to the poller crates when nothing overrides it
    fn default_level(self) -> Option<&'static str> {
        match self {
            LoggingMode::Silent => None,
            LoggingMode::Development => Some("info"),
            LoggingMode::Debug => Some("debug"),
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directives}': {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a global subscriber for `mode`.
///
/// `POLLER_LOG_LEVEL` overrides the mode's level. A bare level (`trace`)
/// applies to the poller crates only; a full directive list
/// (`poller=trace,tokio=debug`) is used as is. `RUST_LOG` is consulted when
/// `POLLER_LOG_LEVEL` is unset.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let Some(default_level) = mode.default_level() else {
        return Ok(());
    };

    let directives = filter_directives(
        std::env::var("POLLER_LOG_LEVEL").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        default_level,
    );
    let filter = EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
        directives: directives.clone(),
        reason: e.to_string(),
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match mode {
        LoggingMode::Development => builder.compact().with_target(false).try_init(),
        LoggingMode::Debug => builder
            .pretty()
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init(),
        LoggingMode::Silent => return Ok(()),
    };

    installed.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Install a subscriber for the mode named by `POLLER_LOG_MODE`
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    init_logging(LoggingMode::from_env_value(
        std::env::var("POLLER_LOG_MODE").ok().as_deref(),
    ))
}

fn filter_directives(level_override: Option<&str>, rust_log: Option<&str>, default_level: &str) -> String {
    match (level_override, rust_log) {
        (Some(directives), _) if is_directive_list(directives) => directives.to_string(),
        (Some(level), _) => poller_directives(level.trim()),
        (None, Some(rust_log)) => rust_log.to_string(),
        (None, None) => poller_directives(default_level),
    }
}

fn is_directive_list(value: &str) -> bool {
    value.contains('=') || value.contains(',')
}

fn poller_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for target in POLLER_TARGETS {
        directives.push_str(&format!(",{}={}", target, level));
    }
    directives
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
