//! Frame-rate helpers.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;
/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Frame period in microseconds for `fps` frames per second (fps clamped to >= 1, result >= 1).
#[inline]
pub fn frame_period_us(fps: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(fps.max(1))).max(1)
}

/// Frame period in milliseconds for `fps` frames per second (fps clamped to >= 1, result >= 1).
#[inline]
pub fn frame_period_ms(fps: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(fps.max(1))).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_for_common_rates() {
        assert_eq!(frame_period_ms(30), 33);
        assert_eq!(frame_period_us(30), 33_333);
        assert_eq!(frame_period_ms(0), 1000);
        assert_eq!(frame_period_ms(5000), 1);
    }
}
