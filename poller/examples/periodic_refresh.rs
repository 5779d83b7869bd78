//! Refresh a value every 200ms for two seconds, printing each result.
//!
//! Run with `POLLER_LOG_MODE=development` to see the poller's own log output.

use std::time::{Duration, Instant};

use poller::logging::init_logging_from_env;
use poller::{PollScope, Poller, PollerConfig, PollerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let config = PollerConfig::new()
        .with_poll_interval(Duration::from_millis(200))
        .with_timeout(Duration::from_secs(2));
    config.validate()?;

    let poller: Poller<u128> = Poller::from_config(PollScope::current()?, &config)?;
    let started = Instant::now();
    let mut states = poller.subscribe();

    poller.poll(move || async move { started.elapsed().as_millis() });

    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        match state {
            PollerState::InProgress(millis) => println!("refreshed at {}ms", millis),
            terminal if terminal.is_terminal() => {
                println!("poll finished: {}", terminal.name());
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
