//! Type-state builder for `RepCounter` and the plain `build_counter` constructor.
//!
//! The builder enforces at compile time that the joint triple is provided
//! before `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use crate::angle::AngleEngine;
use crate::config::*;
use crate::counter::RepCounter;
use crate::debounce::DebounceGuard;
use crate::error::{BuildError, Result};
use crate::state_machine::RepStateMachine;
use crate::status::StatusMessage;

impl RepCounter {
    /// Start building a RepCounter.
    pub fn builder() -> RepCounterBuilder<Missing> {
        RepCounterBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `RepCounter`. All fields are validated on `build()`.
pub struct RepCounterBuilder<J> {
    joints: Option<JointTriple>,
    thresholds: Option<ThresholdCfg>,
    gate: Option<GateCfg>,
    debounce: Option<DebounceCfg>,
    display: Option<DisplayCfg>,
    _j: PhantomData<J>,
}

impl Default for RepCounterBuilder<Missing> {
    fn default() -> Self {
        Self {
            joints: None,
            thresholds: None,
            gate: None,
            debounce: None,
            display: None,
            _j: PhantomData,
        }
    }
}

/// Validate configuration and construct a `RepCounter` in its initial state.
///
/// Shared by `RepCounterBuilder::try_build()` and `build_counter()`.
fn validate_and_build(
    joints: JointTriple,
    thresholds: ThresholdCfg,
    gate: GateCfg,
    debounce: DebounceCfg,
    display: DisplayCfg,
) -> Result<RepCounter> {
    if !joints.is_distinct() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "proximal, vertex and distal joints must be distinct",
        )));
    }
    // A threshold on 0 or 180 can never be crossed strictly.
    let open_range = |deg: f32| deg > 0.0 && deg < 180.0;
    if !open_range(thresholds.flex_enter_deg) || !open_range(thresholds.extend_enter_deg) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "thresholds must be in (0, 180) degrees",
        )));
    }
    if !(0.0..=1.0).contains(&gate.confidence_threshold) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "confidence_threshold must be in [0.0, 1.0]",
        )));
    }
    if !(0.0..=180.0).contains(&display.neutral_angle_deg) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "neutral_angle_deg must be in [0, 180]",
        )));
    }
    // Finite and ordered thresholds are checked by the state machine itself.
    let machine = RepStateMachine::new(thresholds).map_err(eyre::Report::new)?;

    tracing::debug!(
        vertex = %joints.vertex,
        flex_enter_deg = thresholds.flex_enter_deg,
        extend_enter_deg = thresholds.extend_enter_deg,
        debounce_ms = debounce.duration_ms,
        "rep counter configured"
    );

    Ok(RepCounter {
        joints,
        engine: AngleEngine::from_gate(&gate),
        machine,
        guard: DebounceGuard::new(debounce.duration_ms),
        neutral_angle_deg: display.neutral_angle_deg,
        count: 0,
        display_angle: display.neutral_angle_deg.round() as i32,
        message: StatusMessage::Ready,
        samples: 0,
        gated: 0,
        suppressed: 0,
    })
}

impl<J> RepCounterBuilder<J> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<RepCounter> {
        let joints = self
            .joints
            .ok_or_else(|| eyre::Report::new(BuildError::MissingJoints))?;

        validate_and_build(
            joints,
            self.thresholds.unwrap_or_default(),
            self.gate.unwrap_or_default(),
            self.debounce.unwrap_or_default(),
            self.display.unwrap_or_default(),
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<J> RepCounterBuilder<J> {
    pub fn with_thresholds(mut self, thresholds: ThresholdCfg) -> Self {
        self.thresholds = Some(thresholds);
        self
    }
    pub fn with_gate(mut self, gate: GateCfg) -> Self {
        self.gate = Some(gate);
        self
    }
    pub fn with_debounce(mut self, debounce: DebounceCfg) -> Self {
        self.debounce = Some(debounce);
        self
    }
    pub fn with_display(mut self, display: DisplayCfg) -> Self {
        self.display = Some(display);
        self
    }
}

impl RepCounterBuilder<Missing> {
    pub fn with_joints(self, joints: JointTriple) -> RepCounterBuilder<Set> {
        RepCounterBuilder {
            joints: Some(joints),
            thresholds: self.thresholds,
            gate: self.gate,
            debounce: self.debounce,
            display: self.display,
            _j: PhantomData,
        }
    }
}

impl RepCounterBuilder<Set> {
    /// Validate and build. Only available once the joint triple is set.
    pub fn build(self) -> Result<RepCounter> {
        self.try_build()
    }
}

/// Build a `RepCounter` from explicit configuration without the builder.
///
/// Delegates to the shared `validate_and_build`.
pub fn build_counter(
    joints: JointTriple,
    thresholds: ThresholdCfg,
    gate: GateCfg,
    debounce: DebounceCfg,
    display: DisplayCfg,
) -> Result<RepCounter> {
    validate_and_build(joints, thresholds, gate, debounce, display)
}
