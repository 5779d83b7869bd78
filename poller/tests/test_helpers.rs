//! Test helpers for driving pollers on tokio's paused clock.
//!
//! Tests run with `#[tokio::test(start_paused = true)]`. Virtual time is
//! advanced one millisecond at a time so every sleep registered by a poll
//! task is observed at its exact deadline, as it would be in real time.
#![allow(dead_code)]

use std::future::Ready;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use poller::{PollScope, PollStrategy, Poller};

pub const INTERVAL: Duration = Duration::from_millis(1_000);

/// Give spawned poll tasks a chance to run.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Advance the virtual clock by `millis`, letting tasks run at every step.
pub async fn advance_millis(millis: u64) {
    settle().await;
    for _ in 0..millis {
        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
    }
}

/// A unit of work returning 1, 2, 3, ... and the counter it increments.
pub fn counting_work() -> (Arc<AtomicU32>, impl FnMut() -> Ready<u32> + Send + 'static) {
    let counter = Arc::new(AtomicU32::new(0));
    let work_counter = Arc::clone(&counter);
    let work = move || std::future::ready(work_counter.fetch_add(1, Ordering::SeqCst) + 1);
    (counter, work)
}

/// A poller on the current runtime with a one second interval.
pub fn create_poller(strategy: impl PollStrategy + 'static) -> Poller<u32> {
    let scope = PollScope::current().expect("tests run inside a tokio runtime");
    Poller::new(scope, INTERVAL, strategy).expect("valid poller configuration")
}
