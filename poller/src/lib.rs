//! # poller
//!
//! Repeatedly execute an async unit of work at a fixed interval until a
//! continuation strategy says stop, publishing the lifecycle as an observable
//! value.
//!
//! A [`Poller`] is bound to a [`PollScope`] (a tokio runtime handle plus a
//! cancellation token). Calling [`Poller::poll`] launches one task that, on
//! every tick, consults the [`PollStrategy`], runs the work, publishes
//! [`PollerState::InProgress`] and sleeps for the interval. The run ends with
//! exactly one terminal state:
//!
//! - [`PollerState::Complete`] when the strategy disallows another iteration
//! - [`PollerState::Cancelled`] on [`Poller::stop`], handle cancellation or
//!   scope cancellation
//! - [`PollerState::Failed`] when the work returns an error or panics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use poller::{PollScope, Poller, PollerState};
//!
//! # async fn example() -> poller::Result<()> {
//! let poller: Poller<usize> = Poller::finite(
//!     PollScope::current()?,
//!     Duration::from_millis(500),
//!     Some(10),
//!     None,
//! )?;
//!
//! let mut states = poller.subscribe();
//! poller.poll(|| async { 42 });
//!
//! while states.changed().await.is_ok() {
//!     if let PollerState::InProgress(value) = &*states.borrow() {
//!         println!("latest value: {}", value);
//!     }
//!     if states.borrow().is_terminal() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handle;
pub mod logging;
mod poller;
mod scope;
mod state;

pub use config::PollerConfig;
pub use error::{PollerError, Result};
pub use handle::PollHandle;
pub use poller::Poller;
pub use scope::PollScope;
pub use state::PollerState;

pub use poll_strategy::{AllOf, Indefinite, PollStrategy, RetryLimit, StrategyError, Timeout};
