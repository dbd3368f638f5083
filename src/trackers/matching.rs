use crate::utils::bbox::BoundingBox;
use itertools::iproduct;
use log::trace;

/// Result of associating tracks with detections
///
/// Indices refer to the canonical orders passed to the matcher: tracks in ascending id order,
/// detections in input order.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// committed `(track_index, detection_index)` pairs, in the order they were selected
    ///
    pub matches: Vec<(usize, usize)>,
    /// ascending indices of tracks left without a detection
    ///
    pub unmatched_tracks: Vec<usize>,
    /// ascending indices of detections left without a track
    ///
    pub unmatched_detections: Vec<usize>,
}

impl Assignment {
    /// Nothing matched: every track and every detection is left over
    ///
    pub fn unmatched(tracks: usize, detections: usize) -> Self {
        Self {
            matches: Vec::default(),
            unmatched_tracks: (0..tracks).collect(),
            unmatched_detections: (0..detections).collect(),
        }
    }
}

/// IoU between every track box (rows) and every detection box (columns)
///
pub fn iou_matrix(tracks: &[BoundingBox], detections: &[BoundingBox]) -> Vec<Vec<f32>> {
    tracks
        .iter()
        .map(|t| {
            detections
                .iter()
                .map(|d| BoundingBox::iou(t, d))
                .collect()
        })
        .collect()
}

/// Greedy association of tracks and detections by IoU
///
/// # Parameters
/// * `tracks` - track boxes in ascending track id order
/// * `detections` - detection boxes in input order
/// * `threshold` - minimal IoU accepted for a pair
///
pub fn greedy_match(
    tracks: &[BoundingBox],
    detections: &[BoundingBox],
    threshold: f32,
) -> Assignment {
    greedy_match_matrix(&iou_matrix(tracks, detections), detections.len(), threshold)
}

/// Greedy association over a precomputed score matrix
///
/// The highest score among unused rows and columns is committed until it drops below
/// `threshold`. Candidates are scanned row by row, column by column, and the first maximum wins,
/// so equal scores always resolve to the lowest track index, then the lowest detection index.
/// The result is locally optimal only: a globally better assignment may exist.
///
/// # Parameters
/// * `scores` - `rows x columns` matrix, one row per track
/// * `columns` - amount of detections, required when there are no rows
/// * `threshold` - minimal score accepted for a pair
///
pub fn greedy_match_matrix(scores: &[Vec<f32>], columns: usize, threshold: f32) -> Assignment {
    let rows = scores.len();
    if rows == 0 || columns == 0 {
        return Assignment::unmatched(rows, columns);
    }

    let mut used_rows = vec![false; rows];
    let mut used_columns = vec![false; columns];
    let mut matches = Vec::with_capacity(rows.min(columns));

    loop {
        let mut best: Option<(usize, usize, f32)> = None;
        for (row, column) in iproduct!(0..rows, 0..columns) {
            if used_rows[row] || used_columns[column] {
                continue;
            }
            let score = scores[row][column];
            if score.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((row, column, score));
            }
        }

        match best {
            Some((row, column, score)) if score >= threshold => {
                trace!(
                    "Matched track #{} with detection #{}, IoU={}",
                    row,
                    column,
                    score
                );
                used_rows[row] = true;
                used_columns[column] = true;
                matches.push((row, column));
            }
            _ => break,
        }
    }

    Assignment {
        matches,
        unmatched_tracks: (0..rows).filter(|r| !used_rows[*r]).collect(),
        unmatched_detections: (0..columns).filter(|c| !used_columns[*c]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::trackers::matching::{greedy_match, greedy_match_matrix, iou_matrix, Assignment};
    use crate::utils::bbox::BoundingBox;

    #[test]
    fn highest_first() {
        let scores = vec![vec![0.5, 0.9, 0.1], vec![0.8, 0.95, 0.2], vec![0.1, 0.1, 0.4]];
        let a = greedy_match_matrix(&scores, 3, 0.3);
        assert_eq!(a.matches, vec![(1, 1), (0, 0), (2, 2)]);
        assert!(a.unmatched_tracks.is_empty());
        assert!(a.unmatched_detections.is_empty());
    }

    #[test]
    fn stops_below_threshold() {
        let scores = vec![vec![0.9, 0.2], vec![0.25, 0.1]];
        let a = greedy_match_matrix(&scores, 2, 0.3);
        assert_eq!(a.matches, vec![(0, 0)]);
        assert_eq!(a.unmatched_tracks, vec![1]);
        assert_eq!(a.unmatched_detections, vec![1]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let scores = vec![vec![0.3]];
        assert_eq!(greedy_match_matrix(&scores, 1, 0.3).matches, vec![(0, 0)]);
        assert!(greedy_match_matrix(&scores, 1, 0.31).matches.is_empty());
    }

    #[test]
    fn greedy_is_not_optimal() {
        // the optimal assignment is (0,1) + (1,0) with the total of 1.5,
        // greedy commits the single best pair first and strands track 1
        let scores = vec![vec![0.9, 0.8], vec![0.7, 0.0]];
        let a = greedy_match_matrix(&scores, 2, 0.3);
        assert_eq!(a.matches, vec![(0, 0)]);
        assert_eq!(a.unmatched_tracks, vec![1]);
        assert_eq!(a.unmatched_detections, vec![1]);
    }

    #[test]
    fn ties_resolve_in_canonical_order() {
        let scores = vec![vec![0.5, 0.5], vec![0.5, 0.5]];
        let a = greedy_match_matrix(&scores, 2, 0.3);
        assert_eq!(a.matches, vec![(0, 0), (1, 1)]);

        let scores = vec![vec![0.1, 0.6, 0.6], vec![0.6, 0.6, 0.1]];
        let a = greedy_match_matrix(&scores, 3, 0.3);
        assert_eq!(a.matches, vec![(0, 1), (1, 0)]);
        assert_eq!(a.unmatched_detections, vec![2]);

        let b = greedy_match_matrix(&scores, 3, 0.3);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_sides() {
        let a = greedy_match_matrix(&[], 3, 0.3);
        assert_eq!(a, Assignment::unmatched(0, 3));
        assert_eq!(a.unmatched_detections, vec![0, 1, 2]);

        let boxes = [BoundingBox::new(0.0, 0.0, 1.0, 1.0)];
        let a = greedy_match(&boxes, &[], 0.3);
        assert_eq!(a, Assignment::unmatched(1, 0));
    }

    #[test]
    fn pairs_are_bounded_by_smaller_side() {
        let tracks = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(0.5, 0.5, 10.5, 10.5),
            BoundingBox::new(1.0, 1.0, 11.0, 11.0),
        ];
        let detections = [BoundingBox::new(0.2, 0.2, 10.2, 10.2)];
        let a = greedy_match(&tracks, &detections, 0.3);
        assert_eq!(a.matches, vec![(0, 0)]);
        assert_eq!(a.unmatched_tracks, vec![1, 2]);
    }

    #[test]
    fn box_matching() {
        let tracks = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(100.0, 100.0, 120.0, 120.0),
        ];
        let detections = [
            BoundingBox::new(101.0, 101.0, 121.0, 121.0),
            BoundingBox::new(500.0, 500.0, 510.0, 510.0),
            BoundingBox::new(1.0, 0.0, 11.0, 10.0),
        ];
        let m = iou_matrix(&tracks, &detections);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].len(), 3);
        assert_eq!(m[0][1], 0.0);

        let a = greedy_match(&tracks, &detections, 0.3);
        assert_eq!(a.matches.len(), 2);
        assert!(a.matches.contains(&(0, 2)));
        assert!(a.matches.contains(&(1, 0)));
        assert!(a.unmatched_tracks.is_empty());
        assert_eq!(a.unmatched_detections, vec![1]);
    }

    #[test]
    fn zero_threshold_accepts_disjoint_pairs() {
        let tracks = [BoundingBox::new(0.0, 0.0, 1.0, 1.0)];
        let detections = [BoundingBox::new(5.0, 5.0, 6.0, 6.0)];
        let a = greedy_match(&tracks, &detections, 0.0);
        assert_eq!(a.matches, vec![(0, 0)]);
    }
}
