//! The per-sample repetition counter (`RepCounter`).
//!
//! Every frame flows angle engine → hysteresis state machine → debounce guard
//! → count, synchronously and in arrival order. Low-quality frames degrade to
//! an advisory status; nothing in here fails at runtime.

use repcount_traits::PoseFrame;

use crate::angle::{AngleEngine, Validity};
use crate::config::JointTriple;
use crate::debounce::DebounceGuard;
use crate::state_machine::{RepState, RepStateMachine, Transition};
use crate::status::{Status, StatusMessage};

pub struct RepCounter {
    pub(crate) joints: JointTriple,
    pub(crate) engine: AngleEngine,
    pub(crate) machine: RepStateMachine,
    pub(crate) guard: DebounceGuard,
    pub(crate) neutral_angle_deg: f32,

    pub(crate) count: u32,
    pub(crate) display_angle: i32,
    pub(crate) message: StatusMessage,

    // Telemetry, zeroed on reset
    pub(crate) samples: u64,
    pub(crate) gated: u64,
    pub(crate) suppressed: u64,
}

impl core::fmt::Debug for RepCounter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RepCounter")
            .field("vertex", &self.joints.vertex)
            .field("count", &self.count)
            .field("state", &self.machine.state())
            .field("display_angle", &self.display_angle)
            .finish()
    }
}

impl RepCounter {
    /// Process one frame stamped `now_ms` and report the resulting status.
    pub fn on_sample(&mut self, frame: &PoseFrame, now_ms: u64) -> Status {
        self.samples = self.samples.saturating_add(1);

        let sample = self.engine.compute(
            frame.get(self.joints.proximal),
            frame.get(self.joints.vertex),
            frame.get(self.joints.distal),
        );

        match (sample.validity(), sample.degrees()) {
            (Validity::Valid, Some(deg)) => self.apply_angle(deg, now_ms),
            (validity, _) => {
                self.gated = self.gated.saturating_add(1);
                self.message = if validity == Validity::Degenerate {
                    StatusMessage::Degenerate
                } else {
                    StatusMessage::LowConfidence
                };
                tracing::trace!(t_ms = now_ms, ?validity, "sample gated");
            }
        }

        self.status()
    }

    /// `on_sample` using the frame's own timestamp.
    pub fn on_frame(&mut self, frame: &PoseFrame) -> Status {
        self.on_sample(frame, frame.timestamp_ms)
    }

    /// Return to the initial state. Safe to call repeatedly.
    pub fn reset(&mut self, now_ms: u64) -> Status {
        let previous = self.count;
        self.count = 0;
        self.machine.reset();
        self.guard.unlock();
        self.display_angle = round_display(self.neutral_angle_deg);
        self.message = StatusMessage::Reset;
        self.samples = 0;
        self.gated = 0;
        self.suppressed = 0;
        tracing::info!(t_ms = now_ms, previous, "counter reset");
        self.status()
    }

    pub fn status(&self) -> Status {
        Status {
            count: self.count,
            state: self.machine.state(),
            display_angle: self.display_angle,
            message: self.message,
        }
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn state(&self) -> RepState {
        self.machine.state()
    }

    pub fn display_angle(&self) -> i32 {
        self.display_angle
    }

    pub fn joints(&self) -> JointTriple {
        self.joints
    }

    /// Telemetry: frames processed since construction or the last reset.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Telemetry: frames rejected as low-confidence or degenerate.
    pub fn gated(&self) -> u64 {
        self.gated
    }

    /// Telemetry: Flexed → Extended transitions that fell inside the refractory window.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn is_debounce_locked(&self, now_ms: u64) -> bool {
        self.guard.is_locked(now_ms)
    }

    fn apply_angle(&mut self, deg: f32, now_ms: u64) {
        self.display_angle = round_display(deg);

        match self.machine.observe(deg) {
            Some(Transition::ToFlexed) => {
                self.message = StatusMessage::FlexReached;
                tracing::debug!(t_ms = now_ms, angle = deg, "flex reached");
            }
            Some(Transition::ToExtended) => {
                if self.guard.try_consume(now_ms) {
                    self.count = self.count.saturating_add(1);
                    self.message = StatusMessage::RepCounted;
                    tracing::info!(t_ms = now_ms, count = self.count, angle = deg, "rep counted");
                } else {
                    self.suppressed = self.suppressed.saturating_add(1);
                    self.message = StatusMessage::RepSuppressed;
                    tracing::debug!(
                        t_ms = now_ms,
                        unlocks_at_ms = self.guard.unlocks_at_ms(),
                        "rep suppressed by debounce"
                    );
                }
            }
            None => {
                if self.message.is_transient() {
                    self.message = StatusMessage::Tracking;
                }
            }
        }
    }
}

// Angles are in [0, 180] here, so the cast cannot truncate.
#[inline]
fn round_display(deg: f32) -> i32 {
    deg.round() as i32
}
