//! Counting commands: config mapping, session wiring, and status output.

use std::path::Path;
use std::sync::Arc;

use repcount_core::config::{DebounceCfg, DisplayCfg, GateCfg, JointTriple, ThresholdCfg};
use repcount_core::error::{RepError, Result as CoreResult};
use repcount_core::runner::RunParams;
use repcount_core::synth::pose_for_angle;
use repcount_core::{FramePump, RepCounter, Session, SessionHandle, SessionSummary, Status};
use repcount_traits::clock::{Clock, MonotonicClock};

use crate::source::{Recorded, SimParams, SimSource, load_recording};

/// Build a counter from a validated config via the `From` impls in `repcount_core::conversions`.
pub fn counter_from_config(cfg: &repcount_config::Config) -> CoreResult<RepCounter> {
    let joints = JointTriple::try_from(&cfg.joints)?;
    RepCounter::builder()
        .with_joints(joints)
        .with_thresholds(ThresholdCfg::from(&cfg.thresholds))
        .with_gate(GateCfg::from(&cfg.gate))
        .with_debounce(DebounceCfg::from(&cfg.debounce))
        .with_display(DisplayCfg::from(&cfg.display))
        .build()
}

/// Writes status and summary lines to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub json: bool,
    pub summary_only: bool,
}

impl Printer {
    pub fn status(&self, t_ms: u64, s: &Status) {
        if self.summary_only {
            return;
        }
        if self.json {
            let line = serde_json::json!({
                "t_ms": t_ms,
                "count": s.count,
                "state": s.state.as_str(),
                "angle_deg": s.display_angle,
                "message": s.message.as_str(),
            });
            println!("{line}");
        } else {
            println!("{t_ms:>8} ms  {s}");
        }
    }

    pub fn summary(&self, sum: &SessionSummary) {
        if self.json {
            let line = serde_json::json!({
                "final_count": sum.status.count,
                "frames": sum.frames,
                "resets": sum.resets,
                "gated": sum.gated,
                "suppressed": sum.suppressed,
            });
            println!("{line}");
        } else {
            println!(
                "final count: {} (frames={}, resets={}, gated={}, suppressed={})",
                sum.status.count, sum.frames, sum.resets, sum.gated, sum.suppressed
            );
        }
    }
}

/// Route Ctrl-C to a clean session shutdown. Only the first call per process installs it.
fn install_ctrlc(handle: &SessionHandle) {
    let h = handle.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = h.shutdown();
    }) {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
    }
}

pub fn run_replay(
    cfg: &repcount_config::Config,
    path: &Path,
    printer: Printer,
) -> CoreResult<SessionSummary> {
    let recording = load_recording(path)?;
    let counter = counter_from_config(cfg)?;
    let params = RunParams::from(&cfg.source);

    tracing::info!(path = %path.display(), events = recording.len(), "replay start");
    let (session, handle) = Session::new(counter);
    install_ctrlc(&handle);

    // Frames and resets share the session queue, so they apply in file order.
    let feeder = std::thread::spawn(move || {
        for item in recording {
            let sent = match item {
                Recorded::Frame(f) => handle.submit(f),
                Recorded::Reset { at_ms } => handle.reset(at_ms),
            };
            if sent.is_err() {
                return;
            }
        }
        let _ = handle.shutdown();
    });

    let result = session.run(params.effective_idle_timeout(), |t, s| printer.status(t, s));
    if feeder.join().is_err() {
        tracing::warn!("replay feeder thread panicked");
    }
    let summary = result?;
    printer.summary(&summary);
    Ok(summary)
}

pub struct SimulateOpts {
    pub reps: u32,
    pub fps: Option<u32>,
    pub jitter_deg: f32,
    pub dropout: f32,
    pub seed: u32,
    pub realtime: bool,
}

pub fn run_simulate(
    cfg: &repcount_config::Config,
    opts: &SimulateOpts,
    printer: Printer,
) -> CoreResult<SessionSummary> {
    if !(0.0..=1.0).contains(&opts.dropout) {
        return Err(eyre::Report::new(RepError::Config(
            "--dropout must be in [0.0, 1.0]".into(),
        )));
    }
    if !opts.jitter_deg.is_finite() || opts.jitter_deg < 0.0 {
        return Err(eyre::Report::new(RepError::Config(
            "--jitter-deg must be a finite value >= 0".into(),
        )));
    }
    let fps = opts.fps.unwrap_or(cfg.source.fps);
    if !(1..=1000).contains(&fps) {
        return Err(eyre::Report::new(RepError::Config(
            "--fps must be in [1, 1000]".into(),
        )));
    }

    let counter = counter_from_config(cfg)?;
    let params = RunParams::from(&cfg.source);
    let clock = MonotonicClock::new();

    let mut source = SimSource::new(
        counter.joints(),
        SimParams {
            reps: opts.reps,
            fps,
            jitter_deg: opts.jitter_deg,
            dropout: opts.dropout,
            seed: opts.seed,
        },
    );
    if opts.realtime {
        let pace: Arc<dyn Clock + Send + Sync> = Arc::new(clock);
        source = source.paced(pace);
    }

    tracing::info!(reps = opts.reps, fps, realtime = opts.realtime, "simulation start");
    let (session, handle) = Session::new(counter);
    install_ctrlc(&handle);
    let pump = FramePump::spawn(source, handle, params.read_timeout, clock);

    let result = session.run(params.effective_idle_timeout(), |t, s| printer.status(t, s));
    tracing::debug!(forwarded = pump.forwarded(), "simulation pump done");
    drop(pump);

    let summary = result?;
    printer.summary(&summary);
    Ok(summary)
}

/// Build a counter from `cfg` and push one synthetic repetition through it.
pub fn self_check(cfg: &repcount_config::Config) -> CoreResult<()> {
    let mut counter = counter_from_config(cfg)?;
    let joints = counter.joints();
    let t = ThresholdCfg::from(&cfg.thresholds);
    let stand = (t.extend_enter_deg + 10.0).min(180.0);
    let bottom = (t.flex_enter_deg - 10.0).max(0.0);
    let confidence = cfg.gate.confidence_threshold.max(0.9);
    let step = cfg.debounce.duration_ms.max(1);

    for (i, deg) in [stand, bottom, stand].into_iter().enumerate() {
        let t_ms = i as u64 * step;
        counter.on_sample(&pose_for_angle(joints, t_ms, deg, confidence), t_ms);
    }
    if counter.count() != 1 {
        return Err(eyre::Report::new(RepError::State(format!(
            "self-check probe counted {} repetitions, expected 1",
            counter.count()
        ))));
    }
    Ok(())
}
