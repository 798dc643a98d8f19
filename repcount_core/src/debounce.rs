//! Refractory lock for counted repetitions.
//!
//! The lock is a stored deadline compared against each sample's timestamp;
//! nothing runs in the background. A sample at `now_ms >= unlocks_at_ms`
//! sees the guard unlocked.

#[derive(Debug, Clone, Default)]
pub struct DebounceGuard {
    unlocks_at_ms: Option<u64>,
    duration_ms: u64,
}

impl DebounceGuard {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            unlocks_at_ms: None,
            duration_ms,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Deadline of the current lock, if one was ever armed.
    pub fn unlocks_at_ms(&self) -> Option<u64> {
        self.unlocks_at_ms
    }

    #[inline]
    pub fn is_locked(&self, now_ms: u64) -> bool {
        matches!(self.unlocks_at_ms, Some(t) if now_ms < t)
    }

    /// Lock until `now_ms + duration_ms` (saturating).
    pub fn arm(&mut self, now_ms: u64, duration_ms: u64) {
        self.unlocks_at_ms = Some(now_ms.saturating_add(duration_ms));
    }

    /// Returns true and re-arms when unlocked; returns false while locked.
    pub fn try_consume(&mut self, now_ms: u64) -> bool {
        if self.is_locked(now_ms) {
            return false;
        }
        self.arm(now_ms, self.duration_ms);
        true
    }

    pub fn unlock(&mut self) {
        self.unlocks_at_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::DebounceGuard;

    #[test]
    fn zero_duration_never_suppresses() {
        let mut g = DebounceGuard::new(0);
        assert!(g.try_consume(10));
        assert!(g.try_consume(10));
        assert!(!g.is_locked(10));
    }

    #[test]
    fn arm_saturates_at_u64_max() {
        let mut g = DebounceGuard::new(500);
        g.arm(u64::MAX - 1, 500);
        assert_eq!(g.unlocks_at_ms(), Some(u64::MAX));
        assert!(g.is_locked(u64::MAX - 1));
    }
}
