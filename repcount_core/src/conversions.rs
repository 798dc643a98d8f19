//! `From` implementations bridging `repcount_config` types to `repcount_core` types.
//!
//! The CLI maps a validated `repcount_config::Config` through these instead of
//! copying fields by hand.

use std::time::Duration;

use crate::angle::Projection;
use crate::config::{DebounceCfg, DisplayCfg, GateCfg, JointTriple, ThresholdCfg};
use crate::error::RepError;
use crate::runner::RunParams;

// ── JointTriple ──────────────────────────────────────────────────────────────

impl TryFrom<&repcount_config::JointsCfg> for JointTriple {
    type Error = eyre::Report;

    fn try_from(c: &repcount_config::JointsCfg) -> Result<Self, Self::Error> {
        let [proximal, vertex, distal] = c
            .resolve()
            .map_err(|e| eyre::Report::new(RepError::Config(e.to_string())))?;
        Ok(Self::new(proximal, vertex, distal))
    }
}

// ── ThresholdCfg ─────────────────────────────────────────────────────────────

impl From<&repcount_config::ThresholdsCfg> for ThresholdCfg {
    fn from(c: &repcount_config::ThresholdsCfg) -> Self {
        Self {
            flex_enter_deg: c.flex_enter_deg,
            extend_enter_deg: c.extend_enter_deg,
        }
    }
}

// ── GateCfg ──────────────────────────────────────────────────────────────────

impl From<repcount_config::ProjectionMode> for Projection {
    fn from(m: repcount_config::ProjectionMode) -> Self {
        match m {
            repcount_config::ProjectionMode::Planar => Projection::Planar,
            repcount_config::ProjectionMode::Spatial => Projection::Spatial,
        }
    }
}

impl From<&repcount_config::GateCfg> for GateCfg {
    fn from(c: &repcount_config::GateCfg) -> Self {
        Self {
            confidence_threshold: c.confidence_threshold,
            projection: c.projection.into(),
        }
    }
}

// ── DebounceCfg / DisplayCfg ─────────────────────────────────────────────────

impl From<&repcount_config::DebounceCfg> for DebounceCfg {
    fn from(c: &repcount_config::DebounceCfg) -> Self {
        Self {
            duration_ms: c.duration_ms,
        }
    }
}

impl From<&repcount_config::DisplayCfg> for DisplayCfg {
    fn from(c: &repcount_config::DisplayCfg) -> Self {
        Self {
            neutral_angle_deg: c.neutral_angle_deg,
        }
    }
}

// ── RunParams ────────────────────────────────────────────────────────────────

impl From<&repcount_config::SourceCfg> for RunParams {
    fn from(c: &repcount_config::SourceCfg) -> Self {
        Self {
            read_timeout: Duration::from_millis(c.read_timeout_ms.max(1)),
            idle_timeout: (c.idle_timeout_ms > 0).then(|| Duration::from_millis(c.idle_timeout_ms)),
        }
    }
}
