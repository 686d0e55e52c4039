use posematch::config::JointSet;
use posematch::features::{FeatureExtractor, FeatureTracker};
use posematch::pose::{Landmark, LandmarkSet, POSE_LANDMARK_COUNT};
use proptest::prelude::*;
use std::f32::consts::PI;

mod common;

// --- STRATEGIES ---

fn arb_coordinate() -> impl Strategy<Value = f32> {
    prop_oneof![
        4 => 0.0..1.0f32,
        1 => -10.0..10.0f32,
        1 => -1e38..1e38f32,
    ]
}

prop_compose! {
    // Mostly on-screen, sometimes far outside the image
    fn arb_landmark()(x in arb_coordinate(), y in arb_coordinate(), visibility in 0.0..1.0f32) -> Landmark {
        Landmark { x, y, z: 0.0, visibility }
    }
}

prop_compose! {
    // Strictly away from (0, 0) so no joint is accidentally degenerate
    fn arb_visible_landmark()(x in 0.05..1.0f32, y in 0.05..1.0f32) -> Landmark {
        Landmark::new(x, y)
    }
}

fn arb_pose() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec(arb_landmark(), 0..40).prop_map(LandmarkSet::new)
}

fn arb_full_pose() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec(arb_visible_landmark(), POSE_LANDMARK_COUNT).prop_map(LandmarkSet::new)
}

fn arb_joint_set() -> impl Strategy<Value = JointSet> {
    prop_oneof![Just(JointSet::Primary), Just(JointSet::Extended)]
}

proptest! {
    #[test]
    fn prop_angles_have_fixed_length_and_range(set in arb_pose(), joints in arb_joint_set()) {
        let ex = FeatureExtractor::new(joints);
        let angles = ex.angles(&set);
        prop_assert_eq!(angles.len(), ex.feature_len());
        for a in angles {
            prop_assert!(a.is_finite());
            prop_assert!((0.0..=PI).contains(&a), "angle {} out of range", a);
        }
    }

    #[test]
    fn prop_gap_fill_touches_only_the_missing_joint(
        current in arb_full_pose(),
        previous in arb_full_pose(),
        k in 0..POSE_LANDMARK_COUNT,
    ) {
        let ex = FeatureExtractor::new(JointSet::Extended);

        let mut with_gap = current.clone();
        with_gap.points[k] = Landmark { x: 0.0, y: 0.0, z: 0.0, visibility: 0.0 };

        let mut expected = current.clone();
        expected.points[k] = previous.points[k];

        let filled = ex.fill_gaps(&with_gap, Some(&previous));
        prop_assert_eq!(&filled, &expected);
        prop_assert_eq!(ex.angles(&filled), ex.angles(&expected));
    }

    #[test]
    fn prop_tracker_output_is_always_full_length(
        frames in proptest::collection::vec(proptest::option::of(arb_pose()), 1..20)
    ) {
        let mut tracker = FeatureTracker::new(FeatureExtractor::new(JointSet::Primary));
        for frame in &frames {
            let out = tracker.next(frame.as_ref());
            prop_assert_eq!(out.features.len(), 8);
            prop_assert_eq!(out.pose_found, frame.is_some());
        }
    }
}

#[test]
fn test_no_pose_before_any_pose_is_zeros() {
    let mut tracker = FeatureTracker::new(FeatureExtractor::new(JointSet::Primary));
    let out = tracker.next(None);
    assert!(!out.pose_found);
    assert_eq!(out.features, vec![0.0; 8]);
}

#[test]
fn test_no_pose_repeats_last_pose() {
    let mut tracker = FeatureTracker::new(FeatureExtractor::new(JointSet::Primary));
    let seen = tracker.next(Some(&common::pose(0.5))).features;
    let held = tracker.next(None).features;
    assert_eq!(seen, held);
}

#[test]
fn test_mirrored_pose_swaps_limb_angles() {
    let ex = FeatureExtractor::new(JointSet::Primary);
    let p = common::pose(1.0);
    let a = ex.angles(&p);
    let m = ex.angles(&p.mirrored());

    // Left elbow of the mirror is the right elbow of the original
    assert!((a[0] - m[1]).abs() < 1e-5);
    assert!((a[1] - m[0]).abs() < 1e-5);
}
