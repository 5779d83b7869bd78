//! Strategy bounded by a number of executions.

use std::time::Duration;

use crate::error::StrategyError;
use crate::strategy::PollStrategy;

/// Run the poll for at most `max_retries` executions.
///
/// The number of elapsed retries is `elapsed_poll_time / poll_interval`
/// (integer division), and the poll continues while it is below the limit.
/// The first execution happens at zero elapsed time, so `max_retries` counts
/// every execution including the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryLimit {
    max_retries: u32,
}

impl RetryLimit {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl PollStrategy for RetryLimit {
    fn can_poll(&self, poll_interval: Duration, elapsed_poll_time: Duration) -> bool {
        let interval = poll_interval.as_nanos();
        if interval == 0 {
            return false;
        }
        let elapsed_retries = elapsed_poll_time.as_nanos() / interval;
        elapsed_retries < u128::from(self.max_retries)
    }

    fn validate(&self) -> Result<(), StrategyError> {
        if self.max_retries == 0 {
            return Err(StrategyError::ZeroRetries);
        }
        Ok(())
    }
}
