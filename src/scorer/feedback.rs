//! Maps correctness scores to feedback labels.

use crate::feedback::FeedbackLabel;

pub const PERFECT_THRESHOLD: f32 = 0.80;
pub const COOL_THRESHOLD: f32 = 0.60;
pub const PASSABLE_THRESHOLD: f32 = 0.40;

pub fn classify(score: f32) -> FeedbackLabel {
    if score >= PERFECT_THRESHOLD {
        FeedbackLabel::Perfect
    } else if score >= COOL_THRESHOLD {
        FeedbackLabel::Cool
    } else if score >= PASSABLE_THRESHOLD {
        FeedbackLabel::Passable
    } else {
        FeedbackLabel::NotGoodEnough
    }
}

/// Most frequent countable label; ties go to the label seen first.
/// `Unclear` when there is nothing to count.
pub fn majority(labels: &[FeedbackLabel]) -> FeedbackLabel {
    // (label, count) in first-seen order
    let mut tally: Vec<(FeedbackLabel, usize)> = Vec::with_capacity(FeedbackLabel::RANKED.len());

    for &label in labels.iter().filter(|l| l.is_countable()) {
        match tally.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    let mut best: Option<(FeedbackLabel, usize)> = None;
    for &(label, count) in &tally {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label).unwrap_or(FeedbackLabel::Unclear)
}
