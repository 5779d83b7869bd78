//! Handle to a launched poll run.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{PollerError, Result};

/// Handle returned by [`Poller::poll`](crate::Poller::poll).
///
/// Cancelling through the handle has the same effect as
/// [`Poller::stop`](crate::Poller::stop) for this run. Dropping the handle
/// detaches it; the run keeps going.
#[derive(Debug)]
pub struct PollHandle {
    generation: u64,
    join: JoinHandle<()>,
    token: CancellationToken,
}

impl PollHandle {
    pub(crate) fn new(generation: u64, join: JoinHandle<()>, token: CancellationToken) -> Self {
        Self {
            generation,
            join,
            token,
        }
    }

    /// Sequence number of this run on its poller, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Request cancellation of this run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the run's task has ended and published its terminal state
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run's task to end
    pub async fn join(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| PollerError::TaskJoin(e.to_string()))
    }
}
