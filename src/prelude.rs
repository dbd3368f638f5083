pub use crate::detection::Detection;
pub use crate::track::{TrackState, TrackView, BBOX_SMOOTHING_FACTOR};
pub use crate::trackers::counting::{CountingTracker, FrameTracks};
pub use crate::trackers::matching::{greedy_match, Assignment};
pub use crate::trackers::options::{
    TrackerBuilder, TrackerOptions, DEFAULT_IOU_THRESHOLD, DEFAULT_MAX_DISAPPEARED,
};
pub use crate::trackers::shared::{SessionTrackers, SharedTracker};
pub use crate::trackers::worker::{Counts, TrackerWorker};
pub use crate::utils::bbox::BoundingBox;
pub use crate::{Errors, EstimateClose};
