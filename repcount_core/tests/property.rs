use proptest::prelude::*;
use repcount_core::config::{DebounceCfg, JointTriple, ThresholdCfg};
use repcount_core::synth::pose_for_angle;
use repcount_core::{RepCounter, RepState};

const JOINTS: JointTriple = JointTriple::left_knee();
const FLEX: f32 = 100.0;
const EXTEND: f32 = 160.0;

fn counter(debounce_ms: u64) -> RepCounter {
    RepCounter::builder()
        .with_joints(JOINTS)
        .with_thresholds(ThresholdCfg {
            flex_enter_deg: FLEX,
            extend_enter_deg: EXTEND,
        })
        .with_debounce(DebounceCfg {
            duration_ms: debounce_ms,
        })
        .build()
        .unwrap()
}

// Synthesized angles carry float noise; keep samples clear of the thresholds.
fn low() -> impl Strategy<Value = f32> {
    5.0f32..99.0
}
fn mid() -> impl Strategy<Value = f32> {
    101.0f32..159.0
}
fn high() -> impl Strategy<Value = f32> {
    161.0f32..179.0
}
fn any_angle() -> impl Strategy<Value = f32> {
    prop_oneof![low(), mid(), high()]
}

/// Angles with strictly increasing timestamps.
fn timed(angles: Vec<f32>, gaps: Vec<u64>) -> Vec<(u64, f32)> {
    let mut t = 0u64;
    angles
        .into_iter()
        .zip(gaps.into_iter().chain(std::iter::repeat(33)))
        .map(|(a, gap)| {
            t += gap;
            (t, a)
        })
        .collect()
}

fn run(c: &mut RepCounter, samples: &[(u64, f32)]) {
    for &(t, a) in samples {
        c.on_sample(&pose_for_angle(JOINTS, t, a, 0.95), t);
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn deadband_never_transitions(angles in prop::collection::vec(mid(), 1..100), start_flexed in any::<bool>()) {
        let mut c = counter(500);
        if start_flexed {
            run(&mut c, &[(0, 50.0)]);
        }
        let expected = c.state();
        let samples = timed(angles, vec![]);
        run(&mut c, &samples);
        prop_assert_eq!(c.state(), expected);
        prop_assert_eq!(c.count(), 0);
    }

    #[test]
    fn one_count_per_cycle(
        pre in prop::collection::vec(mid(), 0..10),
        lows in prop::collection::vec(low(), 1..20),
        between in prop::collection::vec(mid(), 0..10),
        highs in prop::collection::vec(high(), 1..20),
    ) {
        let mut c = counter(500);
        let angles: Vec<f32> = pre.into_iter().chain(lows).chain(between).chain(highs).collect();
        run(&mut c, &timed(angles, vec![]));
        prop_assert_eq!(c.count(), 1);
        prop_assert_eq!(c.state(), RepState::Extended);
    }

    #[test]
    fn count_matches_reference_model(
        angles in prop::collection::vec(any_angle(), 1..200),
        gaps in prop::collection::vec(1u64..400, 200),
        debounce_ms in 0u64..1_000,
    ) {
        let samples = timed(angles, gaps);
        let mut c = counter(debounce_ms);
        run(&mut c, &samples);

        let mut flexed = false;
        let mut unlock_at: Option<u64> = None;
        let mut count = 0u32;
        let mut suppressed = 0u64;
        for &(t, a) in &samples {
            if !flexed && a < FLEX {
                flexed = true;
            } else if flexed && a > EXTEND {
                flexed = false;
                if unlock_at.is_some_and(|u| t < u) {
                    suppressed += 1;
                } else {
                    count += 1;
                    unlock_at = Some(t + debounce_ms);
                }
            }
        }
        prop_assert_eq!(c.count(), count);
        prop_assert_eq!(c.suppressed(), suppressed);
        prop_assert_eq!(c.state() == RepState::Flexed, flexed);
    }

    #[test]
    fn gated_samples_do_not_change_outcome(
        angles in prop::collection::vec(any_angle(), 1..120),
        inserts in prop::collection::vec((0usize..120, any_angle(), prop::bool::ANY), 0..40),
    ) {
        let samples = timed(angles, vec![]);
        let mut clean = counter(300);
        run(&mut clean, &samples);

        let mut noisy = counter(300);
        for (i, &(t, a)) in samples.iter().enumerate() {
            for (_, junk, hidden) in inserts.iter().filter(|(at, _, _)| *at == i) {
                let frame = if *hidden {
                    pose_for_angle(JOINTS, t, *junk, 0.05)
                } else {
                    // Proximal and vertex on top of each other.
                    let mut f = pose_for_angle(JOINTS, t, *junk, 0.95);
                    let v = *f.get(JOINTS.vertex).unwrap();
                    f.insert(JOINTS.proximal, v);
                    f
                };
                noisy.on_sample(&frame, t);
            }
            noisy.on_sample(&pose_for_angle(JOINTS, t, a, 0.95), t);
        }

        prop_assert_eq!(noisy.count(), clean.count());
        prop_assert_eq!(noisy.state(), clean.state());
        prop_assert_eq!(noisy.display_angle(), clean.display_angle());
    }

    #[test]
    fn reset_is_idempotent(angles in prop::collection::vec(any_angle(), 0..80), at in 0u64..10_000) {
        let mut c = counter(500);
        run(&mut c, &timed(angles, vec![]));
        let first = c.reset(at);
        let second = c.reset(at);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.count, 0);
        prop_assert_eq!(first.state, RepState::Extended);
        prop_assert_eq!(first.display_angle, counter(500).status().display_angle);
    }
}
