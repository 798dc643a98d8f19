//! Pose inputs for the CLI: recorded streams and the squat simulator.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eyre::WrapErr;
use repcount_core::config::JointTriple;
use repcount_core::error::RepError;
use repcount_core::synth::{pose_for_angle, squat_wave};
use repcount_traits::clock::Clock;
use repcount_traits::{Joint, Landmark, PoseFrame, PoseSource};
use serde::Deserialize;

/// One entry of a recording, in file order.
#[derive(Debug, Clone)]
pub enum Recorded {
    Frame(PoseFrame),
    Reset { at_ms: u64 },
}

impl Recorded {
    pub fn t_ms(&self) -> u64 {
        match self {
            Recorded::Frame(f) => f.timestamp_ms,
            Recorded::Reset { at_ms } => *at_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonLandmark {
    x: f32,
    y: f32,
    #[serde(default)]
    z: Option<f32>,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct JsonLine {
    t_ms: u64,
    #[serde(default)]
    landmarks: BTreeMap<String, JsonLandmark>,
    #[serde(default)]
    reset: bool,
}

/// Load a `.csv` or JSON-lines recording. Failures are `RepError::Io`.
pub fn load_recording(path: &Path) -> eyre::Result<Vec<Recorded>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let loaded = if is_csv {
        repcount_config::load_recording_csv(path)
            .map(|frames| frames.into_iter().map(Recorded::Frame).collect())
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read recording {}", path.display()))
            .and_then(|text| parse_jsonl(&text))
    };
    loaded.map_err(|e| eyre::Report::new(RepError::Io(format!("{e:#}"))))
}

/// Parse JSON lines; blank lines are skipped, timestamps must not decrease.
pub fn parse_jsonl(text: &str) -> eyre::Result<Vec<Recorded>> {
    let mut out: Vec<Recorded> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let parsed: JsonLine = serde_json::from_str(line)
            .map_err(|e| eyre::eyre!("recording line {line_no}: {e}"))?;

        if let Some(prev) = out.last()
            && parsed.t_ms < prev.t_ms()
        {
            eyre::bail!(
                "recording line {line_no}: t_ms {} goes backwards (previous {})",
                parsed.t_ms,
                prev.t_ms()
            );
        }

        if parsed.reset {
            if !parsed.landmarks.is_empty() {
                eyre::bail!("recording line {line_no}: a reset line must not carry landmarks");
            }
            out.push(Recorded::Reset { at_ms: parsed.t_ms });
            continue;
        }

        let mut frame = PoseFrame::new(parsed.t_ms);
        for (name, lm) in parsed.landmarks {
            let joint = name
                .parse::<Joint>()
                .map_err(|e| eyre::eyre!("recording line {line_no}: {e}"))?;
            let mut landmark = Landmark::new(lm.x, lm.y);
            landmark.z = lm.z;
            landmark.confidence = lm.confidence;
            frame.insert(joint, landmark);
        }
        out.push(Recorded::Frame(frame));
    }
    Ok(out)
}

/// Simulator knobs.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    pub reps: u32,
    pub fps: u32,
    pub jitter_deg: f32,
    pub dropout: f32,
    pub seed: u32,
}

/// Seconds per synthesized squat.
const REP_SECONDS: u64 = 2;
const STAND_DEG: f32 = 175.0;
const BOTTOM_DEG: f32 = 70.0;
const HIDDEN_CONFIDENCE: f32 = 0.1;
const VISIBLE_CONFIDENCE: f32 = 0.95;

/// A `PoseSource` performing `reps` squats at `fps`, optionally paced by a clock.
pub struct SimSource {
    joints: JointTriple,
    params: SimParams,
    frames_per_rep: u64,
    total: u64,
    idx: u64,
    rng: u32,
    pace: Option<Arc<dyn Clock + Send + Sync>>,
}

impl SimSource {
    pub fn new(joints: JointTriple, params: SimParams) -> Self {
        let fps = u64::from(params.fps.max(1));
        let frames_per_rep = fps.saturating_mul(REP_SECONDS).max(4);
        Self {
            joints,
            params,
            frames_per_rep,
            total: frames_per_rep.saturating_mul(u64::from(params.reps)),
            idx: 0,
            rng: params.seed.max(1),
            pace: None,
        }
    }

    /// Sleep one frame period on `clock` before each frame.
    pub fn paced(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.pace = Some(clock);
        self
    }

    // xorshift32 in [0, 1)
    fn next_unit(&mut self) -> f32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    }
}

impl PoseSource for SimSource {
    fn next_frame(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<PoseFrame>, Box<dyn std::error::Error + Send + Sync>> {
        if self.idx >= self.total {
            return Ok(None);
        }
        let period_ms = repcount_core::util::frame_period_ms(self.params.fps);
        if let Some(clock) = &self.pace {
            clock.sleep(Duration::from_micros(repcount_core::util::frame_period_us(
                self.params.fps,
            )));
        }

        let phase = (self.idx % self.frames_per_rep) as f64 / self.frames_per_rep as f64;
        let noise = (self.next_unit() * 2.0 - 1.0) * self.params.jitter_deg;
        let angle = (squat_wave(phase, BOTTOM_DEG, STAND_DEG) + noise).clamp(0.0, 180.0);
        let confidence = if self.next_unit() < self.params.dropout {
            HIDDEN_CONFIDENCE
        } else {
            VISIBLE_CONFIDENCE
        };

        let frame = pose_for_angle(self.joints, self.idx * period_ms, angle, confidence);
        self.idx += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_reads_frames_and_resets() {
        let text = r#"
{"t_ms": 0, "landmarks": {"right_knee": {"x": 0.5, "y": 0.5, "confidence": 0.9}}}

{"t_ms": 40, "reset": true}
"#;
        let got = parse_jsonl(text).unwrap();
        assert_eq!(got.len(), 2);
        match &got[0] {
            Recorded::Frame(f) => {
                let lm = f.get(Joint::RightKnee).unwrap();
                assert_eq!(lm.confidence, Some(0.9));
                assert_eq!(lm.z, None);
            }
            other => panic!("expected frame, got {other:?}"),
        }
        assert!(matches!(got[1], Recorded::Reset { at_ms: 40 }));
    }

    #[test]
    fn jsonl_rejects_unknown_joint_with_line_number() {
        let text = "{\"t_ms\": 0, \"landmarks\": {\"tail\": {\"x\": 0.1, \"y\": 0.2}}}\n";
        let err = parse_jsonl(text).unwrap_err().to_string();
        assert!(err.contains("recording line 1"), "{err}");
    }

    #[test]
    fn jsonl_rejects_reset_with_landmarks() {
        let text = "{\"t_ms\": 0}\n{\"t_ms\": 40, \"reset\": true, \"landmarks\": {\"right_knee\": {\"x\": 0.5, \"y\": 0.5}}}\n";
        let err = parse_jsonl(text).unwrap_err().to_string();
        assert!(err.contains("recording line 2"), "{err}");
        assert!(err.contains("must not carry landmarks"), "{err}");
    }

    #[test]
    fn jsonl_rejects_time_going_backwards() {
        let text = "{\"t_ms\": 100}\n{\"t_ms\": 50}\n";
        let err = parse_jsonl(text).unwrap_err().to_string();
        assert!(err.contains("goes backwards"), "{err}");
    }

    #[test]
    fn simulator_is_deterministic_and_finite() {
        let params = SimParams {
            reps: 2,
            fps: 10,
            jitter_deg: 2.0,
            dropout: 0.3,
            seed: 7,
        };
        let drain = |mut s: SimSource| {
            let mut v = Vec::new();
            while let Some(f) = s.next_frame(Duration::ZERO).unwrap() {
                v.push(f);
            }
            v
        };
        let a = drain(SimSource::new(JointTriple::right_knee(), params));
        let b = drain(SimSource::new(JointTriple::right_knee(), params));
        assert_eq!(a.len(), 40);
        assert_eq!(a, b);
        assert_eq!(a[1].timestamp_ms, 100);
    }
}
