use assert_cmd::prelude::*;
use predicates::prelude::*;
use repcount_core::config::JointTriple;
use repcount_core::synth::pose_for_angle;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &tempfile::TempDir, extra: &str) -> PathBuf {
    let toml = format!(
        r#"
[joints]
proximal = "right_hip"
vertex = "right_knee"
distal = "right_ankle"

[thresholds]
flex_enter_deg = 100.0
extend_enter_deg = 160.0

[debounce]
duration_ms = 500

{extra}
"#
    );
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

/// One JSON line per frame for the right knee at the given angles.
fn jsonl_frame(t_ms: u64, deg: f32) -> String {
    let f = pose_for_angle(JointTriple::right_knee(), t_ms, deg, 0.9);
    let mut landmarks = serde_json::Map::new();
    for (joint, lm) in &f.landmarks {
        landmarks.insert(
            joint.as_str().to_string(),
            serde_json::json!({ "x": lm.x, "y": lm.y, "confidence": lm.confidence }),
        );
    }
    serde_json::json!({ "t_ms": t_ms, "landmarks": landmarks }).to_string()
}

fn repcount() -> Command {
    Command::cargo_bin("repcount").unwrap()
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["simulate", "--reps", "3"], 0, "final count: 3", "stdout")]
#[case(&["simulate"], 2, "required", "stderr")]
#[case(&["self-check"], 0, "ok", "stdout")]
#[case(&["simulate", "--reps", "1", "--dropout", "2"], 3, "--dropout", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let mut cmd = repcount();
    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
#[case::inverted_thresholds("[thresholds]\nflex_enter_deg = 150.0\nextend_enter_deg = 120.0\n", "extend_enter_deg")]
#[case::unreachable_extend("[thresholds]\nextend_enter_deg = 180.0\n", "extend_enter_deg must be in (0, 180)")]
#[case::unknown_joint("[joints]\nvertex = \"elbow\"\n", "joints.vertex")]
#[case::bad_projection("[gate]\nprojection = \"fisheye\"\n", "fisheye")]
fn invalid_config_exits_with_config_code(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    repcount()
        .arg("--config")
        .arg(&path)
        .arg("self-check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn missing_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    repcount()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .code(3);
}

#[rstest]
fn replay_jsonl_with_reset() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let rec = dir.path().join("session.jsonl");
    let mut f = fs::File::create(&rec).unwrap();
    for (t, deg) in [(0, 170.0), (100, 90.0), (200, 170.0)] {
        writeln!(f, "{}", jsonl_frame(t, deg)).unwrap();
    }
    writeln!(f).unwrap();
    writeln!(f, r#"{{"t_ms": 300, "reset": true}}"#).unwrap();
    for (t, deg) in [(1_000, 170.0), (1_100, 90.0), (1_200, 170.0), (1_300, 60.0)] {
        writeln!(f, "{}", jsonl_frame(t, deg)).unwrap();
    }
    drop(f);

    repcount()
        .arg("--config")
        .arg(&cfg)
        .arg("replay")
        .arg(&rec)
        .assert()
        .success()
        .stdout(predicate::str::contains("rep counted"))
        .stdout(predicate::str::contains("session reset"))
        .stdout(predicate::str::contains(
            "final count: 1 (frames=7, resets=1, gated=0, suppressed=0)",
        ));
}

#[rstest]
fn replay_csv_counts_and_summary_only_hides_status_lines() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let rec = dir.path().join("session.csv");
    let mut f = fs::File::create(&rec).unwrap();
    writeln!(f, "t_ms,joint,x,y,z,confidence").unwrap();
    for (t, deg) in [(0u64, 170.0f32), (100, 90.0), (200, 170.0)] {
        let frame = pose_for_angle(JointTriple::right_knee(), t, deg, 0.9);
        for (joint, lm) in &frame.landmarks {
            writeln!(f, "{t},{},{},{},,0.9", joint.as_str(), lm.x, lm.y).unwrap();
        }
    }
    drop(f);

    repcount()
        .arg("--config")
        .arg(&cfg)
        .arg("replay")
        .arg(&rec)
        .arg("--summary-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("final count: 1"))
        .stdout(predicate::str::contains("rep counted").not());
}

#[rstest]
fn cli_reports_bad_recording_header() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let bad_csv = dir.path().join("rec.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "time,joint,x,y").unwrap();
    writeln!(f, "0,right_knee,0.5,0.5").unwrap();

    repcount()
        .arg("--config")
        .arg(&cfg)
        .arg("replay")
        .arg(&bad_csv)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn missing_recording_exits_with_input_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    repcount()
        .arg("--config")
        .arg(&cfg)
        .arg("replay")
        .arg(dir.path().join("absent.jsonl"))
        .assert()
        .code(5);
}

#[rstest]
fn stalled_stream_hits_idle_timeout() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[source]\nread_timeout_ms = 1\nidle_timeout_ms = 1\n");

    // At 1 fps in real time the first frame arrives after a second.
    repcount()
        .arg("--config")
        .arg(&cfg)
        .args(["simulate", "--reps", "1", "--fps", "1", "--realtime"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("idle timeout"));
}
