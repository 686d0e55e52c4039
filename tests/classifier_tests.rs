use posematch::feedback::FeedbackLabel::{self, *};
use posematch::scorer::{classify, majority, ScoreAggregator};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(1.0, Perfect)]
#[case(0.80, Perfect)]
#[case(0.79999, Cool)]
#[case(0.60, Cool)]
#[case(0.59999, Passable)]
#[case(0.40, Passable)]
#[case(0.39999, NotGoodEnough)]
#[case(0.0, NotGoodEnough)]
fn test_classify_boundaries(#[case] score: f32, #[case] expected: FeedbackLabel) {
    assert_eq!(classify(score), expected, "score {}", score);
}

#[rstest]
#[case(&[], Unclear)]
#[case(&[Cool, Cool, Perfect], Cool)]
#[case(&[Perfect, Cool, Cool, Perfect], Perfect)]
#[case(&[Unclear, Unclear, NotGoodEnough], NotGoodEnough)]
fn test_majority(#[case] labels: &[FeedbackLabel], #[case] expected: FeedbackLabel) {
    assert_eq!(majority(labels), expected);
}

#[test]
fn test_labels_print_snake_case() {
    assert_eq!(NotGoodEnough.to_string(), "not_good_enough");
    assert_eq!(serde_json::to_string(&Perfect).unwrap(), "\"perfect\"");
    let none: FeedbackLabel = serde_json::from_str("\"none\"").unwrap();
    assert_eq!(none, Unclear);
}

#[test]
fn test_thirty_frames_at_090_close_one_perfect_window() {
    let mut agg = ScoreAggregator::new(30);
    for i in 1..30 {
        let (_, report) = agg.observe(Some(0.90));
        assert!(report.is_none(), "frame {} closed a window", i);
    }
    assert_eq!(agg.summary().rolling_average.perfect, 0);

    let (label, report) = agg.observe(Some(0.90));
    assert_eq!(label, Perfect);
    assert!(report.is_some());
    assert_eq!(agg.summary().frame.perfect, 30);
    assert_eq!(agg.summary().rolling_average.perfect, 1);
    assert_eq!(agg.summary().rolling_mode.perfect, 1);
}

proptest! {
    #[test]
    fn prop_aggregator_counts_are_consistent(
        scores in proptest::collection::vec(proptest::option::of(0.0..=1.0f32), 0..200),
        interval in 1usize..40,
    ) {
        let mut agg = ScoreAggregator::new(interval);
        for s in &scores {
            agg.observe(*s);
        }

        let valid = scores.iter().filter(|s| s.is_some()).count() as u32;
        let windows = (scores.len() / interval) as u32;
        let summary = agg.summary();

        prop_assert_eq!(agg.frames_seen(), scores.len() as u64);
        prop_assert_eq!(summary.frame.total(), valid);
        prop_assert!(summary.rolling_average.total() <= windows);
        prop_assert!(summary.rolling_mode.total() <= windows);
        // A window has a mean exactly when it has a label
        prop_assert_eq!(summary.rolling_average.total(), summary.rolling_mode.total());
    }
}
