//! Single-owner event queue around a `RepCounter`.
//!
//! Frames and resets from any number of producer threads are serialized
//! through one unbounded channel and applied on the thread that calls
//! `Session::run`, so a reset never interleaves with an in-flight sample.

use std::time::Duration;

use crossbeam_channel as xch;
use repcount_traits::PoseFrame;

use crate::counter::RepCounter;
use crate::error::{RepError, Result};
use crate::status::Status;

#[derive(Debug, Clone)]
pub enum Event {
    Frame(PoseFrame),
    Reset { at_ms: u64 },
    Shutdown,
}

/// Producer side of a session. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: xch::Sender<Event>,
}

impl SessionHandle {
    pub fn submit(&self, frame: PoseFrame) -> Result<()> {
        self.send(Event::Frame(frame))
    }

    pub fn reset(&self, at_ms: u64) -> Result<()> {
        self.send(Event::Reset { at_ms })
    }

    /// Ask the session to stop after the events already queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }

    fn send(&self, event: Event) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| eyre::Report::new(RepError::State("session closed".into())))
    }
}

/// Totals for one `Session::run`. `gated` and `suppressed` span resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub status: Status,
    pub frames: u64,
    pub resets: u64,
    pub gated: u64,
    pub suppressed: u64,
}

pub struct Session {
    counter: RepCounter,
    rx: xch::Receiver<Event>,
}

impl Session {
    pub fn new(counter: RepCounter) -> (Self, SessionHandle) {
        let (tx, rx) = xch::unbounded();
        (Self { counter, rx }, SessionHandle { tx })
    }

    /// Drain events in arrival order until `Shutdown` or until every handle is dropped.
    ///
    /// `on_status(t_ms, status)` runs after each frame and each reset, with the
    /// frame timestamp or the reset's `at_ms`. With `idle_timeout`
    /// set, a gap longer than it between events fails with `RepError::Timeout`.
    pub fn run<F>(self, idle_timeout: Option<Duration>, mut on_status: F) -> Result<SessionSummary>
    where
        F: FnMut(u64, &Status),
    {
        let Session { mut counter, rx } = self;
        let mut frames = 0u64;
        let mut resets = 0u64;
        let mut gated = 0u64;
        let mut suppressed = 0u64;

        loop {
            let event = match idle_timeout {
                Some(limit) => match rx.recv_timeout(limit) {
                    Ok(ev) => ev,
                    Err(xch::RecvTimeoutError::Timeout) => {
                        tracing::warn!(idle_ms = limit.as_millis() as u64, "session idle timeout");
                        return Err(eyre::Report::new(RepError::Timeout));
                    }
                    Err(xch::RecvTimeoutError::Disconnected) => break,
                },
                None => match rx.recv() {
                    Ok(ev) => ev,
                    Err(_) => break,
                },
            };

            match event {
                Event::Frame(frame) => {
                    let gated_before = counter.gated();
                    let suppressed_before = counter.suppressed();
                    let status = counter.on_frame(&frame);
                    frames += 1;
                    gated += counter.gated() - gated_before;
                    suppressed += counter.suppressed() - suppressed_before;
                    on_status(frame.timestamp_ms, &status);
                }
                Event::Reset { at_ms } => {
                    let status = counter.reset(at_ms);
                    resets += 1;
                    on_status(at_ms, &status);
                }
                Event::Shutdown => {
                    tracing::debug!("session shutdown requested");
                    break;
                }
            }
        }

        let summary = SessionSummary {
            status: counter.status(),
            frames,
            resets,
            gated,
            suppressed,
        };
        tracing::info!(
            final_count = summary.status.count,
            frames,
            resets,
            gated,
            suppressed,
            "session finished"
        );
        Ok(summary)
    }
}
