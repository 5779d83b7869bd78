//! Strategy that never stops on its own.

use std::time::Duration;

use crate::strategy::PollStrategy;

/// Run the poll until it is stopped or its scope is cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indefinite;

impl PollStrategy for Indefinite {
    fn can_poll(&self, _poll_interval: Duration, _elapsed_poll_time: Duration) -> bool {
        true
    }
}
