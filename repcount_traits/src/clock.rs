use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source used to stamp frames and pace synthetic providers.
///
/// Rep counting itself never reads a clock: every sample carries its own
/// timestamp. The clock exists for the edges of the system (frame pumps,
/// simulators, stall reporting) so tests can drive them deterministically.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 if `epoch` lies in the future.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let ms = self.now().saturating_duration_since(epoch).as_millis();
        u64::try_from(ms).unwrap_or(u64::MAX)
    }
}

/// Wall-clock implementation backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_clock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock whose time only moves when told to.
    ///
    /// `sleep(d)` advances the shared offset instead of blocking, so a paced
    /// producer runs at full speed while still observing consistent timestamps.
    /// Clones share the same timeline.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        offset_us: Arc<AtomicU64>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_us: Arc::new(AtomicU64::new(0)),
            }
        }

        pub fn advance(&self, d: Duration) {
            let us = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
            let _ = self
                .offset_us
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                    Some(cur.saturating_add(us))
                });
        }

        /// Total simulated time elapsed since construction.
        pub fn elapsed(&self) -> Duration {
            Duration::from_micros(self.offset_us.load(Ordering::SeqCst))
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            self.origin + self.elapsed()
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sleep_advances_without_blocking() {
            let clock = TestClock::new();
            let epoch = clock.now();
            clock.sleep(Duration::from_millis(250));
            clock.sleep(Duration::from_millis(250));
            assert_eq!(clock.ms_since(epoch), 500);
        }

        #[test]
        fn clones_share_the_timeline() {
            let a = TestClock::new();
            let b = a.clone();
            let epoch = a.now();
            b.advance(Duration::from_millis(40));
            assert_eq!(a.ms_since(epoch), 40);
        }
    }
}
