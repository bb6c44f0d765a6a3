//! Bounded-time poller
//!
//! Drives a caller-supplied check on a fixed interval until the waited-on
//! condition clears or the wall-clock budget runs out. The check is a typed
//! operation reporting what it observed, so the loop itself can be tested
//! without any network or logging behind it.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::gate::error::GateError;

/// Timing bounds for one polling run
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum wall-clock time before the poll gives up
    pub timeout: Duration,

    /// Pause between consecutive checks
    pub interval: Duration,
}

/// What a single check observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Nothing left to wait for
    Clear,

    /// The given number of runs is still in flight
    InFlight(usize),
}

/// One observation of the condition being waited on
///
/// Implementations perform the observation, log it, and report whether more
/// waiting is needed. The retry counter is purely diagnostic.
#[async_trait]
pub trait PollCheck: Send {
    async fn observe(&mut self, retries: u32) -> Result<CheckOutcome, GateError>;
}

/// Polls until the check reports clear or the timeout elapses
///
/// Timeout is enforced by wall-clock comparison, never by counting
/// iterations; the elapsed time is tested on both sides of the interval
/// sleep so the loop never runs an extra tick past the boundary. A zero
/// timeout allows exactly one observation.
///
/// # Errors
/// [`GateError::TimeoutExceeded`] when the budget runs out, or whatever the
/// check itself raised.
pub async fn poll(config: &PollConfig, check: &mut dyn PollCheck) -> Result<(), GateError> {
    let started = Instant::now();
    let mut retries: u32 = 0;

    loop {
        retries += 1;

        match check.observe(retries).await? {
            CheckOutcome::Clear => return Ok(()),
            CheckOutcome::InFlight(count) => {
                debug!("Check #{}: {} run(s) still in flight", retries, count);
            }
        }

        if started.elapsed() >= config.timeout {
            return Err(GateError::TimeoutExceeded);
        }

        sleep(config.interval).await;

        if started.elapsed() >= config.timeout {
            return Err(GateError::TimeoutExceeded);
        }
    }
}
