pub mod clock;
pub mod pose;

pub use clock::{Clock, MonotonicClock};
pub use pose::{Joint, Landmark, PoseFrame, UnknownJoint};

/// The external pose-estimation provider.
///
/// `next_frame` blocks for at most `timeout` waiting for the next estimate.
/// `Ok(Some(frame))` delivers a frame, `Ok(None)` signals the end of the
/// stream. Errors are transient from the consumer's point of view; the
/// provider may keep producing frames afterwards.
pub trait PoseSource {
    fn next_frame(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<PoseFrame>, Box<dyn std::error::Error + Send + Sync>>;
}
