//! Two-threshold hysteresis over joint angles.
//!
//! The limb is `Extended` until the angle drops below `flex_enter_deg`, then
//! `Flexed` until it rises above `extend_enter_deg`. Angles inside the
//! deadband `[flex_enter_deg, extend_enter_deg]` never cause a transition.

use std::fmt;

use crate::config::ThresholdCfg;
use crate::error::BuildError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepState {
    #[default]
    Extended,
    Flexed,
}

impl RepState {
    pub fn as_str(self) -> &'static str {
        match self {
            RepState::Extended => "extended",
            RepState::Flexed => "flexed",
        }
    }
}

impl fmt::Display for RepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ToFlexed,
    ToExtended,
}

#[derive(Debug, Clone)]
pub struct RepStateMachine {
    state: RepState,
    flex_enter_deg: f32,
    extend_enter_deg: f32,
}

impl RepStateMachine {
    /// Fails unless both thresholds are finite and `flex_enter_deg < extend_enter_deg`.
    pub fn new(thresholds: ThresholdCfg) -> Result<Self, BuildError> {
        let ThresholdCfg {
            flex_enter_deg,
            extend_enter_deg,
        } = thresholds;
        if !flex_enter_deg.is_finite() || !extend_enter_deg.is_finite() {
            return Err(BuildError::InvalidConfig("thresholds must be finite"));
        }
        if flex_enter_deg >= extend_enter_deg {
            return Err(BuildError::InvalidConfig(
                "flex_enter_deg must be < extend_enter_deg",
            ));
        }
        Ok(Self {
            state: RepState::Extended,
            flex_enter_deg,
            extend_enter_deg,
        })
    }

    #[inline]
    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn thresholds(&self) -> ThresholdCfg {
        ThresholdCfg {
            flex_enter_deg: self.flex_enter_deg,
            extend_enter_deg: self.extend_enter_deg,
        }
    }

    /// Feed one valid angle. Non-finite input is ignored.
    pub fn observe(&mut self, angle_deg: f32) -> Option<Transition> {
        if !angle_deg.is_finite() {
            return None;
        }
        match self.state {
            RepState::Extended if angle_deg < self.flex_enter_deg => {
                self.state = RepState::Flexed;
                Some(Transition::ToFlexed)
            }
            RepState::Flexed if angle_deg > self.extend_enter_deg => {
                self.state = RepState::Extended;
                Some(Transition::ToExtended)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = RepState::Extended;
    }
}
