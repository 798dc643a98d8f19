//! Status reported after every processed sample and on reset.

use std::fmt;

use crate::state_machine::RepState;

/// User-facing feedback attached to a `Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// No sample processed yet.
    Ready,
    /// Valid samples, no recent event to report.
    Tracking,
    FlexReached,
    RepCounted,
    /// Flexed → Extended inside the refractory window.
    RepSuppressed,
    LowConfidence,
    Degenerate,
    Reset,
}

impl StatusMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusMessage::Ready => "ready",
            StatusMessage::Tracking => "tracking",
            StatusMessage::FlexReached => "flex reached",
            StatusMessage::RepCounted => "rep counted",
            StatusMessage::RepSuppressed => "rep suppressed (debounced)",
            StatusMessage::LowConfidence => "low confidence — check visibility/lighting",
            StatusMessage::Degenerate => "body hidden / landmarks overlapping",
            StatusMessage::Reset => "session reset",
        }
    }

    /// Notices that give way to `Tracking` on the next valid sample.
    /// Event messages (flex, counted, suppressed) stay until the next event.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            StatusMessage::Ready
                | StatusMessage::LowConfidence
                | StatusMessage::Degenerate
                | StatusMessage::Reset
        )
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub count: u32,
    pub state: RepState,
    /// Last valid angle rounded to whole degrees.
    pub display_angle: i32,
    pub message: StatusMessage,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={} state={} angle={}° {}",
            self.count, self.state, self.display_angle, self.message
        )
    }
}
