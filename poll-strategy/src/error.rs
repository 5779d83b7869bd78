//! Error types for strategy validation.

/// Misconfiguration detected when a strategy is validated.
///
/// Strategies never fail while deciding; these errors are only produced by
/// [`PollStrategy::validate`](crate::PollStrategy::validate), which pollers
/// call once at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    /// A retry limit of zero would never run the work
    #[error("Retry limit must allow at least one execution")]
    ZeroRetries,

    /// A zero timeout would never run the work
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_error_display() {
        assert_eq!(
            StrategyError::ZeroRetries.to_string(),
            "Retry limit must allow at least one execution"
        );
        assert_eq!(
            StrategyError::ZeroTimeout.to_string(),
            "Timeout must be greater than zero"
        );
    }
}
