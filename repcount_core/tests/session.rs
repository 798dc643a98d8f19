use std::time::Duration;

use repcount_core::config::JointTriple;
use repcount_core::error::RepError;
use repcount_core::synth::pose_for_angle;
use repcount_core::{RepCounter, Session, StatusMessage};

const JOINTS: JointTriple = JointTriple::right_knee();

fn counter() -> RepCounter {
    RepCounter::builder().with_joints(JOINTS).build().unwrap()
}

fn squat(start_ms: u64) -> Vec<repcount_traits::PoseFrame> {
    [170.0, 90.0, 170.0]
        .into_iter()
        .enumerate()
        .map(|(i, a)| pose_for_angle(JOINTS, start_ms + i as u64 * 100, a, 0.9))
        .collect()
}

#[test]
fn processes_events_in_order_and_ends_when_handles_drop() {
    let (session, handle) = Session::new(counter());
    for f in squat(0) {
        handle.submit(f).unwrap();
    }
    handle.reset(300).unwrap();
    for f in squat(1_000) {
        handle.submit(f).unwrap();
    }
    drop(handle);

    let mut seen = Vec::new();
    let summary = session.run(None, |_, s| seen.push(*s)).unwrap();

    assert_eq!(seen.len(), 7);
    assert_eq!(seen[2].count, 1);
    assert_eq!(seen[3].message, StatusMessage::Reset);
    assert_eq!(seen[3].count, 0);
    assert_eq!(summary.status.count, 1);
    assert_eq!(summary.frames, 6);
    assert_eq!(summary.resets, 1);
}

#[test]
fn shutdown_stops_before_later_events() {
    let (session, handle) = Session::new(counter());
    for f in squat(0) {
        handle.submit(f).unwrap();
    }
    handle.shutdown().unwrap();
    for f in squat(1_000) {
        handle.submit(f).unwrap();
    }

    let summary = session.run(None, |_, _| {}).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.status.count, 1);

    // The session is gone now.
    let err = handle.reset(0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RepError>(),
        Some(RepError::State(msg)) if msg == "session closed"
    ));
}

#[test]
fn resets_from_another_thread_are_serialized() {
    let (session, handle) = Session::new(counter());

    let producer = {
        let h = handle.clone();
        std::thread::spawn(move || {
            for rep in 0..20u64 {
                for f in squat(rep * 1_000) {
                    h.submit(f).unwrap();
                }
            }
        })
    };
    let resetter = {
        let h = handle.clone();
        std::thread::spawn(move || {
            for i in 0..5u64 {
                h.reset(i).unwrap();
                std::thread::yield_now();
            }
        })
    };
    drop(handle);

    let mut counts = Vec::new();
    let summary = session.run(None, |_, s| counts.push((s.message, s.count))).unwrap();
    producer.join().unwrap();
    resetter.join().unwrap();

    assert_eq!(summary.frames, 60);
    assert_eq!(summary.resets, 5);
    // Every status right after a reset reports zero.
    assert!(
        counts
            .iter()
            .filter(|(m, _)| *m == StatusMessage::Reset)
            .all(|(_, c)| *c == 0)
    );
    assert!(summary.status.count <= 20);
}

#[test]
fn idle_session_times_out() {
    let (session, handle) = Session::new(counter());
    let err = session
        .run(Some(Duration::from_millis(20)), |_, _| {})
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<RepError>(), Some(RepError::Timeout)));
    drop(handle);
}

#[test]
fn summary_totals_span_resets() {
    let (session, handle) = Session::new(counter());
    handle.submit(pose_for_angle(JOINTS, 0, 90.0, 0.1)).unwrap();
    handle.reset(1).unwrap();
    handle.submit(pose_for_angle(JOINTS, 2, 90.0, 0.1)).unwrap();
    drop(handle);

    let summary = session.run(None, |_, _| {}).unwrap();
    assert_eq!(summary.gated, 2);
    assert_eq!(summary.status.message, StatusMessage::LowConfidence);
}
