//! Error types for the poller crate.

use poll_strategy::StrategyError;

/// Errors raised while constructing or awaiting a poller.
///
/// Queries (`can_poll`, `is_polling`) and `stop` never fail; errors only come
/// from construction-time validation and from awaiting a task handle.
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    /// The poll interval is zero
    #[error("Poll interval must be greater than zero")]
    InvalidInterval,

    /// The continuation policy is misconfigured
    #[error("Invalid poll strategy: {0}")]
    Strategy(#[from] StrategyError),

    /// No tokio runtime is available to host the poll
    #[error("No tokio runtime available to host the poll")]
    NoRuntime,

    /// The poll task could not be awaited
    #[error("Failed to await poll task completion: {0}")]
    TaskJoin(String),
}

/// Convenience type alias for Results using PollerError.
pub type Result<T> = std::result::Result<T, PollerError>;
