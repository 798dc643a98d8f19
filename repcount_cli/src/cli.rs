//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file used when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG: &str = "etc/repcount.toml";

#[derive(Parser, Debug)]
#[command(name = "repcount", version, about = "Squat repetition counter")]
pub struct Cli {
    /// Path to config TOML (typed); defaults apply when absent
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit status lines, summary, and logs as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (error|warn|info|debug|trace); overrides [logging].level, RUST_LOG overrides both
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count repetitions in a recorded pose stream (.jsonl or .csv)
    Replay {
        /// Recording to replay
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print only the final summary line
        #[arg(long, action = ArgAction::SetTrue)]
        summary_only: bool,
    },
    /// Count repetitions of a synthesized squat session
    Simulate {
        /// Number of squats to perform
        #[arg(long)]
        reps: u32,
        /// Frame rate; defaults to source.fps from the config
        #[arg(long, value_name = "FPS")]
        fps: Option<u32>,
        /// Uniform angle noise amplitude in degrees
        #[arg(long, value_name = "DEG", default_value_t = 0.0)]
        jitter_deg: f32,
        /// Probability that a frame loses landmark visibility
        #[arg(long, value_name = "P", default_value_t = 0.0)]
        dropout: f32,
        /// PRNG seed for jitter and dropout
        #[arg(long, default_value_t = 0x5EED)]
        seed: u32,
        /// Pace frames at the wall-clock frame rate instead of as fast as possible
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
        /// Print only the final summary line
        #[arg(long, action = ArgAction::SetTrue)]
        summary_only: bool,
    },
    /// Validate the config and run a one-rep probe
    SelfCheck,
}
