//! Poll task engine and state machine
//!
//! A [`Poller`] owns at most one live run at a time. Each run is a single
//! task on the poller's [`PollScope`] that, on every tick, asks the strategy
//! whether it may continue, invokes the unit of work, publishes the result,
//! advances the elapsed poll time by one interval and sleeps for the interval.
//!
//! Run bookkeeping (running flag, elapsed time, current task token) lives
//! behind one mutex together with a generation counter. Every publication
//! from a run is checked against the current generation under that mutex, so
//! a superseded run can never overwrite the state of the run that replaced it.
//!
//! Lock order: the state channel's lock may be held while taking the run
//! mutex, never the reverse. Publications take the mutex from inside
//! `send_if_modified`, so a subscriber holding a borrow can still query the
//! poller.

use std::any::Any;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use poll_strategy::PollStrategy;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollerConfig;
use crate::error::{PollerError, Result};
use crate::handle::PollHandle;
use crate::scope::PollScope;
use crate::state::PollerState;

/// Mutable run bookkeeping, always accessed under the poller's mutex
#[derive(Debug, Default)]
struct RunSlot {
    /// Whether a run is active
    running: bool,

    /// Accumulated poll time of the current run
    elapsed: Duration,

    /// Incremented on every `poll()`
    generation: u64,

    /// Generation of the last run that published its terminal state
    finished: u64,

    /// Cancellation token of the current run's task
    task: Option<CancellationToken>,
}

/// How a run ended
#[derive(Debug)]
enum RunOutcome {
    Complete,
    Cancelled,
    Failed(String),
}

/// What the loop should do on a tick
enum Tick {
    Run,
    Exhausted,
    Superseded,
}

/// State shared between the poller and its run task
struct Shared<T> {
    interval: Duration,
    strategy: Arc<dyn PollStrategy>,
    slot: Mutex<RunSlot>,
    state_tx: watch::Sender<PollerState<T>>,
}

impl<T> Shared<T> {
    fn can_poll_locked(&self, slot: &RunSlot) -> bool {
        slot.running && self.strategy.can_poll(self.interval, slot.elapsed)
    }

    fn begin_tick(&self, generation: u64) -> Tick {
        let slot = self.slot.lock();
        if slot.generation != generation {
            Tick::Superseded
        } else if self.can_poll_locked(&slot) {
            Tick::Run
        } else {
            Tick::Exhausted
        }
    }

    /// Publish an iteration result and advance elapsed time by one interval.
    ///
    /// Returns `false` if the run has been superseded.
    fn record(&self, generation: u64, result: T) -> bool {
        let mut current = false;
        self.state_tx.send_if_modified(|state| {
            let mut slot = self.slot.lock();
            if slot.generation != generation {
                return false;
            }
            *state = PollerState::InProgress(result);
            slot.elapsed = slot.elapsed.saturating_add(self.interval);
            current = true;
            true
        });
        current
    }

    /// Termination handler, runs exactly once per run.
    fn finish(&self, generation: u64, outcome: RunOutcome) {
        self.state_tx.send_if_modified(|state| {
            let mut slot = self.slot.lock();
            if slot.generation != generation {
                debug!(generation, ?outcome, "Superseded poll run ended");
                return false;
            }

            match &outcome {
                RunOutcome::Complete => info!(generation, "Poll run complete"),
                RunOutcome::Cancelled => info!(generation, "Poll run cancelled"),
                RunOutcome::Failed(reason) => warn!(generation, %reason, "Poll run failed"),
            }

            *state = match outcome {
                RunOutcome::Complete => PollerState::Complete,
                RunOutcome::Cancelled => PollerState::Cancelled,
                RunOutcome::Failed(reason) => PollerState::Failed(reason),
            };
            slot.running = false;
            slot.task = None;
            slot.finished = generation;
            true
        });
    }

    /// Whether the latest run has published its terminal state
    fn settled(&self, state: &PollerState<T>) -> bool {
        let slot = self.slot.lock();
        state.is_terminal() && slot.finished == slot.generation
    }
}

/// Publishes the run's terminal state when dropped.
///
/// The outcome defaults to `Cancelled`, which covers the task future being
/// dropped without finishing (runtime shutdown or abort).
struct RunGuard<T> {
    shared: Arc<Shared<T>>,
    generation: u64,
    outcome: Option<RunOutcome>,
}

impl<T> Drop for RunGuard<T> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(RunOutcome::Cancelled);
        self.shared.finish(self.generation, outcome);
    }
}

/// Repeatedly executes a unit of work at a fixed interval until its
/// continuation strategy says stop.
///
/// Cloning a `Poller` yields another handle to the same poller. Dropping
/// every handle does not end a run; stop it or cancel its scope.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use poller::{Poller, PollScope, RetryLimit};
///
/// # async fn example() -> poller::Result<()> {
/// let poller: Poller<u64> = Poller::new(
///     PollScope::current()?,
///     Duration::from_secs(1),
///     RetryLimit::new(4),
/// )?;
///
/// let mut count = 0;
/// poller.poll(move || {
///     count += 1;
///     std::future::ready(count)
/// });
///
/// let terminal = poller.wait_for_terminal().await;
/// assert!(terminal.is_terminal());
/// # Ok(())
/// # }
/// ```
pub struct Poller<T> {
    scope: PollScope,
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Poller<T> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Poller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.shared.slot.lock();
        f.debug_struct("Poller")
            .field("interval", &self.shared.interval)
            .field("strategy", &self.shared.strategy)
            .field("running", &slot.running)
            .field("elapsed", &slot.elapsed)
            .field("generation", &slot.generation)
            .finish()
    }
}

impl<T> Poller<T>
where
    T: Send + Sync + 'static,
{
    /// Create a poller bound to `scope`.
    ///
    /// Rejects a zero interval and strategies that fail validation.
    pub fn new(
        scope: PollScope,
        poll_interval: Duration,
        strategy: impl PollStrategy + 'static,
    ) -> Result<Self> {
        Self::with_shared_strategy(scope, poll_interval, Arc::new(strategy))
    }

    /// Create a poller from an already shared strategy
    pub fn with_shared_strategy(
        scope: PollScope,
        poll_interval: Duration,
        strategy: Arc<dyn PollStrategy>,
    ) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }
        strategy.validate()?;

        let (state_tx, _state_rx) = watch::channel(PollerState::Initial);

        Ok(Self {
            scope,
            shared: Arc::new(Shared {
                interval: poll_interval,
                strategy,
                slot: Mutex::new(RunSlot::default()),
                state_tx,
            }),
        })
    }

    /// Create a poller that runs until stopped
    pub fn indefinite(scope: PollScope, poll_interval: Duration) -> Result<Self> {
        Self::from_config(
            scope,
            &PollerConfig::new().with_poll_interval(poll_interval),
        )
    }

    /// Create a poller bounded by a retry limit and/or a repeat count.
    ///
    /// `repeat_count` bounds the elapsed poll time to `repeat_count` intervals.
    /// A `None` limit places no bound; with both `None` the poller is
    /// indefinite.
    pub fn finite(
        scope: PollScope,
        poll_interval: Duration,
        max_retries: Option<u32>,
        repeat_count: Option<u32>,
    ) -> Result<Self> {
        let mut config = PollerConfig::new().with_poll_interval(poll_interval);
        if let Some(max_retries) = max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(repeat_count) = repeat_count {
            config = config.with_repeat_count(repeat_count);
        }
        Self::from_config(scope, &config)
    }

    /// Create a poller from configuration
    pub fn from_config(scope: PollScope, config: &PollerConfig) -> Result<Self> {
        Self::with_shared_strategy(scope, config.poll_interval, config.strategy())
    }

    /// Start polling with an infallible unit of work.
    ///
    /// Any run already in progress is cancelled first and publishes nothing
    /// further. Elapsed poll time restarts at zero.
    pub fn poll<F, Fut>(&self, mut work: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.try_poll(move || work().map(Ok::<T, Infallible>))
    }

    /// Start polling with a fallible unit of work.
    ///
    /// The first error ends the run with [`PollerState::Failed`]; the work is
    /// never retried. A panic inside the work is reported the same way.
    pub fn try_poll<F, Fut, E>(&self, work: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let token = self.scope.run_token();

        let generation = {
            let mut slot = self.shared.slot.lock();
            if let Some(previous) = slot.task.take() {
                debug!(generation = slot.generation, "Cancelling superseded poll run");
                previous.cancel();
            }
            slot.generation += 1;
            slot.running = true;
            slot.elapsed = Duration::ZERO;
            slot.task = Some(token.clone());
            slot.generation
        };

        debug!(
            generation,
            interval = ?self.shared.interval,
            strategy = ?self.shared.strategy,
            "Starting poll run"
        );

        let guard = RunGuard {
            shared: Arc::clone(&self.shared),
            generation,
            outcome: None,
        };
        let run_token = token.clone();

        let join = self.scope.spawn(async move {
            let mut guard = guard;
            let run = run_loop(Arc::clone(&guard.shared), generation, work);

            let outcome = tokio::select! {
                biased;
                _ = run_token.cancelled() => RunOutcome::Cancelled,
                result = AssertUnwindSafe(run).catch_unwind() => match result {
                    Ok(Ok(())) => RunOutcome::Complete,
                    Ok(Err(reason)) => RunOutcome::Failed(reason),
                    Err(panic) => RunOutcome::Failed(panic_message(panic.as_ref())),
                },
            };

            guard.outcome = Some(outcome);
        });

        PollHandle::new(generation, join, token)
    }

    /// Stop the current run, if any. Idempotent.
    pub fn stop(&self) {
        let mut slot = self.shared.slot.lock();
        slot.running = false;
        if let Some(task) = slot.task.take() {
            info!(generation = slot.generation, "Stopping poll run");
            task.cancel();
        }
    }

    /// Stop only when a run is active; returns whether one was stopped
    pub fn stop_if_polling(&self) -> bool {
        if self.is_polling() {
            self.stop();
            true
        } else {
            false
        }
    }
}

impl<T> Poller<T> {
    /// Whether another iteration would be attempted right now
    pub fn can_poll(&self) -> bool {
        let slot = self.shared.slot.lock();
        self.shared.can_poll_locked(&slot)
    }

    pub fn is_polling(&self) -> bool {
        self.shared.slot.lock().running
    }

    /// Accumulated poll time of the current (or last) run
    pub fn elapsed(&self) -> Duration {
        self.shared.slot.lock().elapsed
    }

    pub fn poll_interval(&self) -> Duration {
        self.shared.interval
    }

    pub fn scope(&self) -> &PollScope {
        &self.scope
    }

    /// Subscribe to state changes.
    ///
    /// The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<PollerState<T>> {
        self.shared.state_tx.subscribe()
    }

    /// Current published state
    pub fn state(&self) -> PollerState<T>
    where
        T: Clone,
    {
        self.shared.state_tx.borrow().clone()
    }

    /// Wait until the latest run publishes its terminal state.
    ///
    /// A terminal value left over from an earlier run does not count. If the
    /// latest run has already ended, returns its terminal state immediately.
    /// Before the first `poll()` this waits for a run to be started and end.
    pub async fn wait_for_terminal(&self) -> PollerState<T>
    where
        T: Clone,
    {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|state| self.shared.settled(state)).await {
            Ok(state) => state.clone(),
            // The sender lives as long as the poller
            Err(_) => self.state(),
        };
        state
    }
}

/// The repeating loop of one run.
///
/// Returns `Ok` when the strategy (or a stop) ends the run, `Err` with the
/// error text when the work fails.
async fn run_loop<T, F, Fut, E>(
    shared: Arc<Shared<T>>,
    generation: u64,
    mut work: F,
) -> std::result::Result<(), String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let mut iteration: u64 = 0;
    loop {
        match shared.begin_tick(generation) {
            Tick::Run => {}
            Tick::Exhausted => {
                debug!(generation, iteration, "Poll strategy exhausted");
                return Ok(());
            }
            Tick::Superseded => return Ok(()),
        }

        iteration += 1;
        let result = work().await.map_err(|e| e.to_string())?;
        debug!(generation, iteration, "Poll iteration finished");

        if !shared.record(generation, result) {
            return Ok(());
        }

        tokio::time::sleep(shared.interval).await;
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("unit of work panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("unit of work panicked: {}", message)
    } else {
        "unit of work panicked".to_string()
    }
}
