use std::time::Duration;

use repcount_traits::PoseSource;
use repcount_traits::clock::{Clock, MonotonicClock};

use crate::counter::RepCounter;
use crate::error::Result as CoreResult;
use crate::pump::FramePump;
use crate::session::{Session, SessionSummary};
use crate::status::Status;

/// Timing for one pumped session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    /// Per-read wait on the provider.
    pub read_timeout: Duration,
    /// Fail with `RepError::Timeout` after this long without any event. `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(100),
            idle_timeout: None,
        }
    }
}

impl RunParams {
    /// An idle watchdog shorter than one read could fire between two healthy frames.
    pub fn effective_idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
            .map(|idle| idle.max(min_idle_timeout(self.read_timeout)))
    }
}

#[inline]
fn min_idle_timeout(read_timeout: Duration) -> Duration {
    read_timeout.saturating_mul(2)
}

/// Pump `source` through a fresh session around `counter` until the stream ends.
pub fn run<P, F>(source: P, counter: RepCounter, params: RunParams, on_status: F) -> CoreResult<SessionSummary>
where
    P: PoseSource + Send + 'static,
    F: FnMut(u64, &Status),
{
    run_with_clock(source, counter, params, MonotonicClock::new(), on_status)
}

/// `run` with an explicit clock for the pump thread.
pub fn run_with_clock<P, C, F>(
    source: P,
    counter: RepCounter,
    params: RunParams,
    clock: C,
    on_status: F,
) -> CoreResult<SessionSummary>
where
    P: PoseSource + Send + 'static,
    C: Clock + Send + Sync + 'static,
    F: FnMut(u64, &Status),
{
    let vertex = counter.joints().vertex;
    let (session, handle) = Session::new(counter);
    let pump = FramePump::spawn(source, handle, params.read_timeout, clock);

    tracing::info!(%vertex, read_timeout_ms = params.read_timeout.as_millis() as u64, "session start");
    let result = session.run(params.effective_idle_timeout(), on_status);

    if let Err(e) = &result {
        tracing::error!(error = %e, stalled_ms = pump.stalled_for_now(), "session aborted");
    }
    drop(pump);
    result
}
