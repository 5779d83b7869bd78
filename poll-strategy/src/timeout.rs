//! Strategy bounded by elapsed poll time.

use std::time::Duration;

use crate::error::StrategyError;
use crate::strategy::PollStrategy;

/// Run the poll while the elapsed poll time is strictly below `timeout`.
///
/// At exactly the timeout boundary the poll stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    timeout: Duration,
}

impl Timeout {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Convenience constructor for a timeout in milliseconds
    pub fn from_millis(timeout_millis: u64) -> Self {
        Self::new(Duration::from_millis(timeout_millis))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl PollStrategy for Timeout {
    fn can_poll(&self, _poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
        elapsed_poll_time < self.timeout
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.timeout.is_zero() {
            return Err(StrategyError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true)]
    #[case(3_999, true)]
    #[case(4_000, false)]
    #[case(4_001, false)]
    fn test_strict_deadline(#[case] elapsed_ms: u64, #[case] expected: bool) {
        let strategy = Timeout::from_millis(4_000);
        assert_eq!(
            strategy.can_poll(Duration::from_millis(1_000), Duration::from_millis(elapsed_ms)),
            expected
        );
    }

    #[test]
    fn test_interval_is_ignored() {
        let strategy = Timeout::from_millis(5_000);
        let elapsed = Duration::from_millis(4_500);
        assert!(strategy.can_poll(Duration::from_millis(1), elapsed));
        assert!(strategy.can_poll(Duration::from_secs(60), elapsed));
    }

    #[test]
    fn test_validation() {
        assert!(Timeout::from_millis(1).validate().is_ok());
        assert_eq!(Timeout::new(Duration::ZERO).validate(), Err(StrategyError::ZeroTimeout));
        assert_eq!(Timeout::from_millis(250).timeout(), Duration::from_millis(250));
    }
}
