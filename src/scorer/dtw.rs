//! Elastic (dynamic time warping) distance between two feature sequences.

use crate::features::FeatureVector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Sum of pair distances along the optimal warping path.
    pub distance: f32,
    /// Number of matched pairs on that path.
    pub path_len: usize,
}

impl Alignment {
    /// `max(0, 1 - distance / path_len)`.
    pub fn score(&self) -> f32 {
        if self.path_len == 0 {
            return 0.0;
        }
        (1.0 - self.distance / self.path_len as f32).max(0.0)
    }
}

/// Mean absolute difference over paired angles.
pub fn mean_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    sum / n as f32
}

/// Full-matrix DTW with mean-absolute-difference as the pair distance.
/// `None` when either sequence is empty.
pub fn elastic_distance(player: &[FeatureVector], reference: &[FeatureVector]) -> Option<Alignment> {
    let n = player.len();
    let m = reference.len();
    if n == 0 || m == 0 {
        return None;
    }

    // Row-major n x m: cumulative cost and path length of the best path into (i, j)
    let mut cost = vec![0.0f32; n * m];
    let mut steps = vec![0usize; n * m];

    for i in 0..n {
        for j in 0..m {
            let d = mean_abs_diff(&player[i], &reference[j]);
            let idx = i * m + j;

            let prev = if i == 0 && j == 0 {
                None
            } else if i == 0 {
                Some(idx - 1)
            } else if j == 0 {
                Some(idx - m)
            } else {
                // Diagonal wins ties, then vertical, then horizontal
                let diag = idx - m - 1;
                let up = idx - m;
                let left = idx - 1;
                let mut best = diag;
                if cost[up] < cost[best] {
                    best = up;
                }
                if cost[left] < cost[best] {
                    best = left;
                }
                Some(best)
            };

            match prev {
                Some(p) => {
                    cost[idx] = cost[p] + d;
                    steps[idx] = steps[p] + 1;
                }
                None => {
                    cost[idx] = d;
                    steps[idx] = 1;
                }
            }
        }
    }

    let last = n * m - 1;
    Some(Alignment {
        distance: cost[last],
        path_len: steps[last],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(values: &[f32]) -> Vec<FeatureVector> {
        values.iter().map(|&v| vec![v, v]).collect()
    }

    #[test]
    fn test_identical_sequences_align_diagonally() {
        let a = seq(&[0.1, 0.2, 0.3, 0.4]);
        let al = elastic_distance(&a, &a).unwrap();
        assert_eq!(al.distance, 0.0);
        assert_eq!(al.path_len, 4);
        assert_eq!(al.score(), 1.0);
    }

    #[test]
    fn test_stretched_sequence_is_free() {
        // Each reference frame held twice by the player
        let player = seq(&[0.1, 0.1, 0.5, 0.5, 0.9, 0.9]);
        let reference = seq(&[0.1, 0.5, 0.9]);
        let al = elastic_distance(&player, &reference).unwrap();
        assert!(al.distance.abs() < 1e-6);
        assert_eq!(al.path_len, 6);
    }

    #[test]
    fn test_constant_offset_costs_per_step() {
        let player = seq(&[0.5, 0.5, 0.5]);
        let reference = seq(&[0.25, 0.25, 0.25]);
        let al = elastic_distance(&player, &reference).unwrap();
        assert_eq!(al.path_len, 3);
        assert!((al.distance - 0.75).abs() < 1e-6);
        assert!((al.score() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input_has_no_alignment() {
        assert!(elastic_distance(&[], &seq(&[0.1])).is_none());
        assert!(elastic_distance(&seq(&[0.1]), &[]).is_none());
    }

    #[test]
    fn test_score_never_negative() {
        let al = Alignment {
            distance: 10.0,
            path_len: 2,
        };
        assert_eq!(al.score(), 0.0);
    }
}
