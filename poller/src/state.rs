//! Observable lifecycle state of a poller.

/// The value published by a [`Poller`](crate::Poller) as it runs.
///
/// Exactly one variant holds at any instant. Within one run the sequence is
/// `InProgress` values in iteration order followed by a single terminal value
/// (`Complete`, `Cancelled` or `Failed`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PollerState<T> {
    /// No poll has been started yet
    #[default]
    Initial,

    /// Output of the latest successful iteration
    InProgress(T),

    /// The strategy disallowed another iteration
    Complete,

    /// The poll or its scope was cancelled before natural completion
    Cancelled,

    /// The unit of work returned an error or panicked
    Failed(String),
}

impl<T> PollerState<T> {
    /// Whether this value ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollerState::Complete | PollerState::Cancelled | PollerState::Failed(_)
        )
    }

    /// The latest iteration output, if any
    pub fn result(&self) -> Option<&T> {
        match self {
            PollerState::InProgress(result) => Some(result),
            _ => None,
        }
    }

    /// Short name of the active variant, used in log output
    pub fn name(&self) -> &'static str {
        match self {
            PollerState::Initial => "initial",
            PollerState::InProgress(_) => "in_progress",
            PollerState::Complete => "complete",
            PollerState::Cancelled => "cancelled",
            PollerState::Failed(_) => "failed",
        }
    }
}
