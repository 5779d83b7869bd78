//! Continuation policies for fixed-interval polling
//!
//! A [`PollStrategy`] is a pure decision function: given the poll interval and
//! the time elapsed since the poll started, it answers whether another
//! iteration may run. Strategies hold no state beyond their configured limit
//! and are shared freely between pollers.
//!
//! # Strategies
//!
//! - [`Indefinite`]: always continue
//! - [`RetryLimit`]: continue for a fixed number of executions
//! - [`Timeout`]: continue while the elapsed time is below a deadline
//! - [`AllOf`]: continue only while every member strategy allows it
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use poll_strategy::{PollStrategy, RetryLimit};
//!
//! let strategy = RetryLimit::new(3);
//! let interval = Duration::from_millis(1_000);
//!
//! assert!(strategy.can_poll(interval, Duration::ZERO));
//! assert!(strategy.can_poll(interval, Duration::from_millis(2_000)));
//! assert!(!strategy.can_poll(interval, Duration::from_millis(3_000)));
//! ```

// Modules
pub mod error;
pub mod indefinite;
pub mod retry_limit;
pub mod strategy;
pub mod timeout;

// Re-exports - Public API
pub use error::StrategyError;
pub use indefinite::Indefinite;
pub use retry_limit::RetryLimit;
pub use strategy::{AllOf, PollStrategy};
pub use timeout::Timeout;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::indefinite::Indefinite;
    pub use crate::retry_limit::RetryLimit;
    pub use crate::strategy::{AllOf, PollStrategy};
    pub use crate::timeout::Timeout;
}
