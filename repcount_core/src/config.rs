//! Configuration types for the rep counter.
//!
//! These are the runtime structs consumed by the builder. They are separate
//! from the TOML-deserialized config in `repcount_config`; see `conversions`.

use repcount_traits::Joint;

use crate::angle::Projection;

/// Ordered (proximal, vertex, distal) joints; the angle is measured at `vertex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriple {
    pub proximal: Joint,
    pub vertex: Joint,
    pub distal: Joint,
}

impl JointTriple {
    pub const fn new(proximal: Joint, vertex: Joint, distal: Joint) -> Self {
        Self {
            proximal,
            vertex,
            distal,
        }
    }

    /// Hip–knee–ankle on the right leg.
    pub const fn right_knee() -> Self {
        Self::new(Joint::RightHip, Joint::RightKnee, Joint::RightAnkle)
    }

    /// Hip–knee–ankle on the left leg.
    pub const fn left_knee() -> Self {
        Self::new(Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle)
    }

    pub(crate) fn is_distinct(&self) -> bool {
        self.proximal != self.vertex && self.vertex != self.distal && self.proximal != self.distal
    }
}

/// Hysteresis thresholds in degrees. `flex_enter_deg < extend_enter_deg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCfg {
    /// Extended → Flexed when the angle drops strictly below this.
    pub flex_enter_deg: f32,
    /// Flexed → Extended when the angle rises strictly above this.
    pub extend_enter_deg: f32,
}

impl Default for ThresholdCfg {
    fn default() -> Self {
        Self {
            flex_enter_deg: 100.0,
            extend_enter_deg: 160.0,
        }
    }
}

/// Confidence gating and angle projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateCfg {
    /// Landmarks below this visibility score make the sample `LowConfidence`.
    pub confidence_threshold: f32,
    pub projection: Projection,
}

impl Default for GateCfg {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            projection: Projection::Planar,
        }
    }
}

/// Refractory lock applied after each counted rep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceCfg {
    pub duration_ms: u64,
}

impl Default for DebounceCfg {
    fn default() -> Self {
        Self { duration_ms: 500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCfg {
    /// Display angle before the first valid sample and after reset.
    pub neutral_angle_deg: f32,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            neutral_angle_deg: 180.0,
        }
    }
}
