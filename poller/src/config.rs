//! Configuration types for the poller crate
//!
//! `PollerConfig` describes a poll's interval and its optional bounds, and
//! builds the matching continuation strategy.

use std::sync::Arc;
use std::time::Duration;

use poll_strategy::{AllOf, Indefinite, PollStrategy, RetryLimit, Timeout};

use crate::error::{PollerError, Result};

/// Configuration for a Poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Fixed interval between the start of consecutive iterations
    /// Default: 1 second
    pub poll_interval: Duration,

    /// Maximum number of executions, including the first
    /// Default: None (unbounded)
    pub max_retries: Option<u32>,

    /// Elapsed poll time after which no iteration starts
    /// Default: None (unbounded)
    pub timeout: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_retries: None,
            timeout: None,
        }
    }
}

impl PollerConfig {
    /// Create a new PollerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a PollerConfig for short-lived, frequent refreshes
    pub fn fast_refresh() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        }
    }

    /// Create a PollerConfig that runs at most `max_retries` times
    pub fn bounded(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }

        self.strategy().validate()?;

        Ok(())
    }

    /// Build the continuation strategy described by this configuration
    pub fn strategy(&self) -> Arc<dyn PollStrategy> {
        match (self.max_retries, self.timeout) {
            (None, None) => Arc::new(Indefinite),
            (Some(max_retries), None) => Arc::new(RetryLimit::new(max_retries)),
            (None, Some(timeout)) => Arc::new(Timeout::new(timeout)),
            (Some(max_retries), Some(timeout)) => Arc::new(
                AllOf::new()
                    .with(RetryLimit::new(max_retries))
                    .with(Timeout::new(timeout)),
            ),
        }
    }

    // Builder pattern methods for fluent configuration

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the poll to `repeat_count` intervals of elapsed time.
    ///
    /// Uses the interval configured at the time of the call.
    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.timeout = Some(self.poll_interval.saturating_mul(repeat_count));
        self
    }
}
