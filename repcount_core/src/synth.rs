//! Synthetic poses with an exact joint angle.
//!
//! The vertex sits at (0.5, 0.5) in normalized image space, the proximal
//! joint straight above it, and the distal joint rotated by the requested
//! angle from the proximal direction. Every landmark gets the same confidence.

use std::f64::consts::PI;

use repcount_traits::{Landmark, PoseFrame};

use crate::config::JointTriple;

const VERTEX: (f64, f64) = (0.5, 0.5);
const SEGMENT: f64 = 0.2;

/// A frame whose `joints` triple forms `degrees` (clamped to [0, 180]) at the vertex.
pub fn pose_for_angle(joints: JointTriple, t_ms: u64, degrees: f32, confidence: f32) -> PoseFrame {
    let theta = f64::from(degrees.clamp(0.0, 180.0)).to_radians();
    let (vx, vy) = VERTEX;
    let proximal = (vx, vy - SEGMENT);
    let distal = (vx + SEGMENT * theta.sin(), vy - SEGMENT * theta.cos());

    let lm = |(x, y): (f64, f64)| Landmark::new(x as f32, y as f32).with_confidence(confidence);
    PoseFrame::new(t_ms)
        .with(joints.proximal, lm(proximal))
        .with(joints.vertex, lm(VERTEX))
        .with(joints.distal, lm(distal))
}

/// Joint angle along one squat, `phase` in [0, 1): standing at `high_deg`,
/// bottoming out at `low_deg` halfway, standing again at the end.
pub fn squat_wave(phase: f64, low_deg: f32, high_deg: f32) -> f32 {
    let depth = (1.0 - (2.0 * PI * phase.rem_euclid(1.0)).cos()) / 2.0;
    let (low, high) = (f64::from(low_deg), f64::from(high_deg));
    (high - (high - low) * depth) as f32
}
