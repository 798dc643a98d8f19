//! Human-readable error descriptions, exit codes, and structured JSON error formatting.

use repcount_core::error::{BuildError, RepError};

pub const EXIT_GENERIC: i32 = 1;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_IDLE_TIMEOUT: i32 = 4;
pub const EXIT_INPUT: i32 = 5;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingJoints => {
                "What happened: No joint triple was provided to the rep counter.\nLikely causes: The builder was used without with_joints(...).\nHow to fix: Set [joints] proximal/vertex/distal in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range or inconsistent values in the TOML.\nHow to fix: Edit the config file, then rerun `repcount self-check`."
            ),
        };
    }

    if let Some(re) = err.downcast_ref::<RepError>() {
        return match re {
            RepError::Config(msg) => format!(
                "What happened: Configuration rejected: {msg}.\nLikely causes: A typo in a joint name, thresholds in the wrong order, or a value out of range.\nHow to fix: Fix the named key in the TOML config and rerun."
            ),
            RepError::Timeout => "What happened: No pose frames arrived within the idle timeout.\nLikely causes: The pose provider stalled or the camera feed stopped.\nHow to fix: Check the provider, or raise source.idle_timeout_ms (0 disables the watchdog).".to_string(),
            RepError::Io(msg) if msg.contains("recording CSV must have headers") => format!(
                "What happened: Invalid headers in recording CSV.\nLikely causes: The file was exported with different columns.\nHow to fix: Use the header 't_ms,joint,x,y,z,confidence'. Original: {msg}"
            ),
            RepError::Io(msg) => format!(
                "What happened: The recording could not be read: {msg}.\nLikely causes: Wrong path, malformed line, or unknown joint name.\nHow to fix: Check the file named above; joint names are snake_case (e.g. right_knee)."
            ),
            RepError::Source(msg) => format!(
                "What happened: The pose provider failed: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
            RepError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 configuration, 4 idle timeout, 5 input, 1 anything else.
/// Usage errors exit with 2 from clap before any of this runs.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return EXIT_CONFIG;
    }
    match err.downcast_ref::<RepError>() {
        Some(RepError::Config(_)) => EXIT_CONFIG,
        Some(RepError::Timeout) => EXIT_IDLE_TIMEOUT,
        Some(RepError::Io(_) | RepError::Source(_)) => EXIT_INPUT,
        _ => EXIT_GENERIC,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingJoints => "MissingJoints",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    match err.downcast_ref::<RepError>() {
        Some(RepError::Config(_)) => "Config",
        Some(RepError::Timeout) => "IdleTimeout",
        Some(RepError::Io(_)) => "Input",
        Some(RepError::Source(_)) => "Source",
        Some(RepError::State(_)) => "State",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
