//! Execution context hosting poll tasks
//!
//! A `PollScope` pairs a tokio runtime handle with a cancellation token. Every
//! run launched on the scope receives a child token, so cancelling the scope
//! cancels all of its runs while each run can still be cancelled on its own.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{PollerError, Result};

/// The execution context a poller schedules its repeating task onto.
#[derive(Debug, Clone)]
pub struct PollScope {
    handle: Handle,
    token: CancellationToken,
}

impl PollScope {
    /// Scope bound to the runtime the caller is running on
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| PollerError::NoRuntime)?;
        Ok(Self::with_handle(handle))
    }

    /// Scope bound to an explicit runtime handle
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            token: CancellationToken::new(),
        }
    }

    /// A scope on the same runtime that is cancelled together with this one
    pub fn child(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            token: self.token.child_token(),
        }
    }

    /// Cancel this scope and every run launched on it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn run_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub(crate) fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }
}
