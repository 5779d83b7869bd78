//! The `PollStrategy` trait and strategy composition.
//!
//! Pollers consult their strategy before every iteration. The trait is kept
//! deliberately small: one pure decision and an optional validation hook.
//!
//! ## Example Implementation
//!
//! ```rust
//! use std::time::Duration;
//! use poll_strategy::PollStrategy;
//!
//! /// Only poll during the first minute.
//! #[derive(Debug)]
//! struct FirstMinute;
//!
//! impl PollStrategy for FirstMinute {
//!     fn can_poll(&self, _poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
//!         elapsed_poll_time < Duration::from_secs(60)
//!     }
//! }
//!
//! assert!(FirstMinute.can_poll(Duration::from_secs(1), Duration::from_secs(59)));
//! ```

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StrategyError;

/// Decides whether a poll may run another iteration.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared with the task
/// driving the poll. They must also be pure: the same inputs always produce
/// the same answer and evaluation never mutates anything.
pub trait PollStrategy: Send + Sync + Debug {
    /// Returns `true` when another iteration may start.
    ///
    /// `elapsed_poll_time` is the accumulated poll time of the current run,
    /// advanced by exactly one `poll_interval` per completed iteration.
    fn can_poll(&self, poll_interval: Duration, elapsed_poll_time: Duration) -> bool;

    /// Reject configurations that could never run or make no sense.
    fn validate(&self) -> Result<(), StrategyError> {
        Ok(())
    }
}

impl<S: PollStrategy + ?Sized> PollStrategy for Arc<S> {
    fn can_poll(&self, poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
        (**self).can_poll(poll_interval, elapsed_poll_time)
    }

    fn validate(&self) -> Result<(), StrategyError> {
        (**self).validate()
    }
}

impl<S: PollStrategy + ?Sized> PollStrategy for Box<S> {
    fn can_poll(&self, poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
        (**self).can_poll(poll_interval, elapsed_poll_time)
    }

    fn validate(&self) -> Result<(), StrategyError> {
        (**self).validate()
    }
}

/// Continue only while every member strategy allows it.
///
/// Used to bound a poll by both a retry count and a deadline. An empty
/// `AllOf` places no bound at all.
#[derive(Debug, Clone, Default)]
pub struct AllOf {
    strategies: Vec<Arc<dyn PollStrategy>>,
}

impl AllOf {
    /// Create an empty composition
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member strategy
    pub fn with(mut self, strategy: impl PollStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Add an already shared member strategy
    pub fn with_shared(mut self, strategy: Arc<dyn PollStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Number of member strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the composition has no members
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl PollStrategy for AllOf {
    fn can_poll(&self, poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
        self.strategies
            .iter()
            .all(|s| s.can_poll(poll_interval, elapsed_poll_time))
    }

    fn validate(&self) -> Result<(), StrategyError> {
        self.strategies.iter().try_for_each(|s| s.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Indefinite, RetryLimit, Timeout};

    const INTERVAL: Duration = Duration::from_millis(1_000);

    #[test]
    fn test_empty_all_of_is_unbounded() {
        let all = AllOf::new();
        assert!(all.is_empty());
        assert!(all.can_poll(INTERVAL, Duration::from_secs(86_400)));
        assert!(all.validate().is_ok());
    }

    #[test]
    fn test_all_of_stops_at_tightest_bound() {
        let all = AllOf::new()
            .with(RetryLimit::new(5))
            .with(Timeout::from_millis(3_000));
        assert_eq!(all.len(), 2);

        assert!(all.can_poll(INTERVAL, Duration::from_millis(2_000)));
        // Timeout is the tighter bound here
        assert!(!all.can_poll(INTERVAL, Duration::from_millis(3_000)));
    }

    #[test]
    fn test_all_of_propagates_validation() {
        let all = AllOf::new().with(Indefinite).with(RetryLimit::new(0));
        assert_eq!(all.validate(), Err(StrategyError::ZeroRetries));
    }

    #[test]
    fn test_shared_and_boxed_strategies_delegate() {
        let shared: Arc<dyn PollStrategy> = Arc::new(Timeout::from_millis(1_000));
        let boxed: Box<dyn PollStrategy> = Box::new(RetryLimit::new(1));

        assert!(!shared.can_poll(INTERVAL, INTERVAL));
        assert!(!boxed.can_poll(INTERVAL, INTERVAL));

        let all = AllOf::new().with_shared(shared).with(boxed);
        assert!(all.can_poll(INTERVAL, Duration::ZERO));
    }
}
