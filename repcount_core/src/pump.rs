//! Background frame pump.
//!
//! Spawns a thread that owns the `PoseSource`, forwards every frame into a
//! session, and tracks the last successful read for stall reporting.
//!
//! Each `FramePump` spawns exactly one thread, joined when the pump is dropped.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use repcount_traits::PoseSource;
use repcount_traits::clock::Clock;

use crate::error::RepError;
use crate::session::SessionHandle;
use crate::source_error::map_source_error;

pub struct FramePump {
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    last_ok: Arc<AtomicU64>,
    forwarded: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl FramePump {
    /// Start pumping `source` into `handle`.
    ///
    /// The stream ends when the source returns `Ok(None)`; the pump then asks
    /// the session to shut down. Source errors are logged and the read retried.
    pub fn spawn<P, C>(mut source: P, handle: SessionHandle, read_timeout: Duration, clock: C) -> Self
    where
        P: PoseSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(clock);
        let shutdown = Arc::new(AtomicBool::new(false));
        let last_ok = Arc::new(AtomicU64::new(0));
        let forwarded = Arc::new(AtomicU64::new(0));
        let epoch = clock.now();

        let thread_clock = clock.clone();
        let thread_shutdown = shutdown.clone();
        let thread_last_ok = last_ok.clone();
        let thread_forwarded = forwarded.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if thread_shutdown.load(Ordering::Relaxed) {
                    tracing::debug!("frame pump received shutdown signal");
                    break;
                }

                match source.next_frame(read_timeout) {
                    Ok(Some(frame)) => {
                        if handle.submit(frame).is_err() {
                            tracing::debug!("session gone, frame pump exiting");
                            break;
                        }
                        thread_forwarded.fetch_add(1, Ordering::Relaxed);
                        thread_last_ok.store(thread_clock.ms_since(epoch), Ordering::Relaxed);
                    }
                    Ok(None) => {
                        tracing::debug!(
                            frames = thread_forwarded.load(Ordering::Relaxed),
                            "pose stream ended"
                        );
                        let _ = handle.shutdown();
                        break;
                    }
                    Err(e) => match map_source_error(e.as_ref()) {
                        // The read already waited for `read_timeout`.
                        RepError::Timeout => tracing::trace!("pose source read timed out"),
                        other => {
                            tracing::warn!(error = %other, "pose source error, retrying");
                            if thread_shutdown.load(Ordering::Relaxed) {
                                break;
                            }
                            thread_clock.sleep(read_timeout);
                        }
                    },
                }
            }
            tracing::trace!("frame pump thread exiting cleanly");
        });

        Self {
            clock,
            epoch,
            last_ok,
            forwarded,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Frames handed to the session so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// Milliseconds since the last forwarded frame, on the pump's own clock.
    pub fn stalled_for_now(&self) -> u64 {
        self.stalled_for(self.clock.ms_since(self.epoch))
    }
}

impl Drop for FramePump {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // A blocked read returns within `read_timeout`, then the flag is seen.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("frame pump thread joined"),
                Err(e) => tracing::warn!(?e, "frame pump thread panicked during shutdown"),
            }
        }
    }
}
