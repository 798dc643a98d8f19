#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Row {
    t_ms: u64,
    joint: String,
    x: f32,
    y: f32,
    z: Option<f32>,
    confidence: Option<f32>,
}

fuzz_target!(|rows: Vec<Row>| {
    let rows: Vec<repcount_config::RecordingRow> = rows
        .into_iter()
        .map(|r| repcount_config::RecordingRow {
            t_ms: r.t_ms,
            joint: r.joint,
            x: r.x,
            y: r.y,
            z: r.z,
            confidence: r.confidence,
        })
        .collect();

    if let Ok(frames) = repcount_config::frames_from_rows(&rows, 2) {
        // Grouped frames are strictly increasing in time.
        assert!(frames.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }
});
