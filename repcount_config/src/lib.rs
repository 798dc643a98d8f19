#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and recording parsing for the rep counter.
//!
//! - `Config` and its tables are deserialized from TOML and validated.
//! - The landmark recording CSV loader enforces headers and groups rows into
//!   frames in timestamp order.
use repcount_traits::{Joint, Landmark, PoseFrame};
use serde::Deserialize;

/// Which three joints define the tracked angle (names as in `Joint::as_str`).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JointsCfg {
    pub proximal: String,
    pub vertex: String,
    pub distal: String,
}

impl Default for JointsCfg {
    fn default() -> Self {
        Self {
            proximal: Joint::RightHip.as_str().to_string(),
            vertex: Joint::RightKnee.as_str().to_string(),
            distal: Joint::RightAnkle.as_str().to_string(),
        }
    }
}

impl JointsCfg {
    /// Resolve the names to joints as `[proximal, vertex, distal]`.
    pub fn resolve(&self) -> eyre::Result<[Joint; 3]> {
        let parse = |key: &str, name: &str| -> eyre::Result<Joint> {
            name.parse::<Joint>()
                .map_err(|e| eyre::eyre!("joints.{key}: {e}"))
        };
        Ok([
            parse("proximal", &self.proximal)?,
            parse("vertex", &self.vertex)?,
            parse("distal", &self.distal)?,
        ])
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdsCfg {
    /// Extended → Flexed once the angle drops strictly below this.
    pub flex_enter_deg: f32,
    /// Flexed → Extended once the angle rises strictly above this.
    pub extend_enter_deg: f32,
}

impl Default for ThresholdsCfg {
    fn default() -> Self {
        Self {
            flex_enter_deg: 100.0,
            extend_enter_deg: 160.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// x/y only.
    #[default]
    Planar,
    /// x/y/z; frames without depth on the triple are degenerate.
    Spatial,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GateCfg {
    pub confidence_threshold: f32,
    pub projection: ProjectionMode,
}

impl Default for GateCfg {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            projection: ProjectionMode::Planar,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DebounceCfg {
    /// Refractory window after a counted rep (ms).
    pub duration_ms: u64,
}

impl Default for DebounceCfg {
    fn default() -> Self {
        Self { duration_ms: 500 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayCfg {
    /// Angle reported before the first valid sample and after reset.
    pub neutral_angle_deg: f32,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            neutral_angle_deg: 180.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceCfg {
    /// Max wait on the provider per frame (ms).
    pub read_timeout_ms: u64,
    /// Stop the session when no event arrives for this long (ms). 0 disables.
    pub idle_timeout_ms: u64,
    /// Frame rate used by the simulator.
    pub fps: u32,
}

impl Default for SourceCfg {
    fn default() -> Self {
        Self {
            read_timeout_ms: 100,
            idle_timeout_ms: 0,
            fps: 30,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub joints: JointsCfg,
    #[serde(default)]
    pub thresholds: ThresholdsCfg,
    #[serde(default)]
    pub gate: GateCfg,
    #[serde(default)]
    pub debounce: DebounceCfg,
    #[serde(default)]
    pub display: DisplayCfg,
    #[serde(default)]
    pub source: SourceCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Joints
        let [p, v, d] = self.joints.resolve()?;
        if p == v || v == d || p == d {
            eyre::bail!("joints.proximal, joints.vertex and joints.distal must be distinct");
        }

        // Thresholds
        // Angles are in [0, 180] and both crossings are strict, so a threshold
        // on either bound could never fire.
        let t = &self.thresholds;
        let open_range = |deg: f32| deg > 0.0 && deg < 180.0;
        if !open_range(t.flex_enter_deg) {
            eyre::bail!("thresholds.flex_enter_deg must be in (0, 180)");
        }
        if !open_range(t.extend_enter_deg) {
            eyre::bail!("thresholds.extend_enter_deg must be in (0, 180)");
        }
        if t.flex_enter_deg >= t.extend_enter_deg {
            eyre::bail!(
                "thresholds.flex_enter_deg ({}) must be < thresholds.extend_enter_deg ({})",
                t.flex_enter_deg,
                t.extend_enter_deg
            );
        }

        // Gate
        let c = self.gate.confidence_threshold;
        if !c.is_finite() || !(0.0..=1.0).contains(&c) {
            eyre::bail!("gate.confidence_threshold must be in [0.0, 1.0]");
        }

        // Debounce
        if self.debounce.duration_ms > 60_000 {
            eyre::bail!("debounce.duration_ms is unreasonably large (>60s)");
        }

        // Display
        let n = self.display.neutral_angle_deg;
        if !n.is_finite() || !(0.0..=180.0).contains(&n) {
            eyre::bail!("display.neutral_angle_deg must be in [0, 180]");
        }

        // Source
        if self.source.read_timeout_ms == 0 {
            eyre::bail!("source.read_timeout_ms must be >= 1");
        }
        if self.source.fps == 0 || self.source.fps > 1000 {
            eyre::bail!("source.fps must be in [1, 1000]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        Ok(())
    }
}

/// Landmark recording CSV schema.
///
/// Expected headers:
/// t_ms,joint,x,y,z,confidence
///
/// `z` and `confidence` may be left empty. Rows sharing a `t_ms` form one frame.
///
/// Example:
/// t_ms,joint,x,y,z,confidence
/// 0,right_hip,0.50,0.30,,0.98
/// 0,right_knee,0.50,0.50,,0.97
/// 0,right_ankle,0.50,0.70,,0.95
#[derive(Debug, Deserialize, Clone)]
pub struct RecordingRow {
    pub t_ms: u64,
    pub joint: String,
    pub x: f32,
    pub y: f32,
    pub z: Option<f32>,
    pub confidence: Option<f32>,
}

/// Group rows into frames. Rows must be ordered by non-decreasing `t_ms`;
/// `first_line` is the file line number of `rows[0]` for error messages.
pub fn frames_from_rows(rows: &[RecordingRow], first_line: usize) -> eyre::Result<Vec<PoseFrame>> {
    let mut frames: Vec<PoseFrame> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let line = first_line + i;
        let joint = row
            .joint
            .parse::<Joint>()
            .map_err(|e| eyre::eyre!("recording line {line}: {e}"))?;
        let mut lm = Landmark::new(row.x, row.y);
        lm.z = row.z;
        lm.confidence = row.confidence;

        match frames.last_mut() {
            Some(last) if last.timestamp_ms == row.t_ms => last.insert(joint, lm),
            Some(last) if last.timestamp_ms > row.t_ms => {
                eyre::bail!(
                    "recording line {line}: t_ms {} goes backwards (previous {})",
                    row.t_ms,
                    last.timestamp_ms
                );
            }
            _ => frames.push(PoseFrame::new(row.t_ms).with(joint, lm)),
        }
    }
    Ok(frames)
}

pub fn load_recording_csv(path: &std::path::Path) -> eyre::Result<Vec<PoseFrame>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open recording CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["t_ms", "joint", "x", "y", "z", "confidence"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "recording CSV must have headers 't_ms,joint,x,y,z,confidence', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<RecordingRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    frames_from_rows(&rows, 2)
}
