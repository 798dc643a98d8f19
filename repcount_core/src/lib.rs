#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core repetition counting (provider-agnostic).
//!
//! This crate turns a stream of pose estimates into a repetition count. All
//! provider interactions go through `repcount_traits::PoseSource`.
//!
//! ## Architecture
//!
//! - **Angles**: dot-product/arccos joint angle with confidence gating (`angle` module)
//! - **Hysteresis**: two-threshold Extended/Flexed machine (`state_machine` module)
//! - **Debounce**: refractory lock evaluated against sample timestamps (`debounce` module)
//! - **Counter**: the per-sample pipeline and its `Status` (`counter`, `status` modules)
//! - **Sessions**: a serialized event queue plus a background frame pump
//!   (`session`, `pump`, `runner` modules)
//!
//! ## Time
//!
//! The counter never reads a clock. Every sample carries its own millisecond
//! timestamp, so replayed and live streams behave identically.

pub mod angle;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod counter;
pub mod debounce;
pub mod error;
pub mod mocks;
pub mod pump;
pub mod runner;
pub mod session;
pub mod source_error;
pub mod state_machine;
pub mod status;
pub mod synth;
pub mod util;

pub use angle::{AngleEngine, AngleSample, Projection, Validity, joint_angle_deg};
pub use builder::{Missing, RepCounterBuilder, Set, build_counter};
pub use config::{DebounceCfg, DisplayCfg, GateCfg, JointTriple, ThresholdCfg};
pub use counter::RepCounter;
pub use debounce::DebounceGuard;
pub use error::{BuildError, RepError, Result};
pub use pump::FramePump;
pub use runner::RunParams;
pub use session::{Event, Session, SessionHandle, SessionSummary};
pub use state_machine::{RepState, RepStateMachine, Transition};
pub use status::{Status, StatusMessage};
