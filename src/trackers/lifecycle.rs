use crate::detection::Detection;
use crate::track::Track;
use crate::trackers::matching::Assignment;
use std::collections::BTreeMap;

/// What happened to the track table during one call
///
#[derive(Debug, Default)]
pub struct LifecycleOutcome {
    /// ids of tracks updated with a detection
    pub matched: Vec<u64>,
    /// ids allocated for unmatched detections, ascending
    pub created: Vec<u64>,
    /// tracks removed because they stayed unmatched for too long
    pub evicted: Vec<Track>,
}

/// Applies the association result to the track table
///
/// Matched tracks are updated first, then every unmatched detection gets a new track,
/// then unmatched pre-existing tracks are aged and evicted once their disappearance counter
/// exceeds `max_disappeared`. Tracks created during the call are never aged by it.
///
/// # Parameters
/// * `tracks` - the track table
/// * `next_id` - id allocator, advanced for every created track
/// * `track_ids` - ids of the tracks the assignment rows refer to, ascending
/// * `detections` - detections the assignment columns refer to
/// * `assignment` - matcher output
/// * `max_disappeared` - eviction threshold
///
pub fn apply(
    tracks: &mut BTreeMap<u64, Track>,
    next_id: &mut u64,
    track_ids: &[u64],
    detections: &[Detection],
    assignment: &Assignment,
    max_disappeared: usize,
) -> LifecycleOutcome {
    let mut outcome = LifecycleOutcome::default();

    for &(track_index, detection_index) in &assignment.matches {
        let id = track_ids[track_index];
        if let Some(track) = tracks.get_mut(&id) {
            track.update(&detections[detection_index]);
            outcome.matched.push(id);
        }
    }

    for &detection_index in &assignment.unmatched_detections {
        let id = *next_id;
        *next_id += 1;
        tracks.insert(id, Track::new(id, &detections[detection_index]));
        outcome.created.push(id);
    }

    for &track_index in &assignment.unmatched_tracks {
        let id = track_ids[track_index];
        let expired = match tracks.get_mut(&id) {
            Some(track) => track.miss() > max_disappeared,
            None => false,
        };
        if expired {
            if let Some(track) = tracks.remove(&id) {
                outcome.evicted.push(track);
            }
        }
    }

    outcome
}
