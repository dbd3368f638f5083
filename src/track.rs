use crate::detection::Detection;
use crate::utils::bbox::BoundingBox;

/// Weight of the observed box when a matched track's box is smoothed
///
pub const BBOX_SMOOTHING_FACTOR: f32 = 0.3;

/// Lifecycle state of a track
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackState {
    /// created during the last call, never matched yet
    #[default]
    New,
    /// matched during the last call
    Tracked,
    /// missed during the last calls, still alive
    Stale,
    /// missed for more than `max_disappeared` calls, evicted from the tracker
    Removed,
}

/// Track record owned by the tracker
///
/// The disappearance counter lives in the record itself, so a track and its counter can never
/// be stored separately.
///
#[derive(Debug, Clone)]
pub struct Track {
    id: u64,
    class_name: String,
    bbox: BoundingBox,
    confidence: f32,
    frames_seen: usize,
    disappeared: usize,
}

impl Track {
    /// Creates a new track from an unmatched detection
    ///
    pub fn new(id: u64, detection: &Detection) -> Self {
        Self {
            id,
            class_name: detection.class_name.clone(),
            bbox: detection.bbox,
            confidence: detection.confidence,
            frames_seen: 1,
            disappeared: 0,
        }
    }

    pub fn get_track_id(&self) -> u64 {
        self.id
    }

    pub fn get_class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get_bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn get_confidence(&self) -> f32 {
        self.confidence
    }

    pub fn get_frames_seen(&self) -> usize {
        self.frames_seen
    }

    pub fn get_disappeared(&self) -> usize {
        self.disappeared
    }

    /// Applies a matched detection. The class of the track is never overwritten.
    ///
    pub fn update(&mut self, detection: &Detection) {
        self.bbox = self.bbox.smooth(&detection.bbox, BBOX_SMOOTHING_FACTOR);
        self.confidence = detection.confidence;
        self.frames_seen += 1;
        self.disappeared = 0;
    }

    /// Registers a missed call and returns the new disappearance counter
    ///
    pub fn miss(&mut self) -> usize {
        self.disappeared += 1;
        self.disappeared
    }

    pub fn state(&self, max_disappeared: usize) -> TrackState {
        if self.disappeared > max_disappeared {
            TrackState::Removed
        } else if self.disappeared > 0 {
            TrackState::Stale
        } else if self.frames_seen == 1 {
            TrackState::New
        } else {
            TrackState::Tracked
        }
    }

    /// Immutable view of the track for callers
    ///
    pub fn view(&self, max_disappeared: usize) -> TrackView {
        TrackView {
            id: self.id,
            class_name: self.class_name.clone(),
            bbox: self.bbox,
            confidence: self.confidence,
            frames_seen: self.frames_seen,
            disappeared: self.disappeared,
            state: self.state(max_disappeared),
        }
    }
}

/// Snapshot of a track returned to the caller
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackView {
    /// id of the track
    ///
    pub id: u64,
    /// class the track was created with
    ///
    #[cfg_attr(feature = "serde", serde(rename = "class"))]
    pub class_name: String,
    /// smoothed box
    ///
    pub bbox: BoundingBox,
    /// confidence of the last matched detection
    ///
    pub confidence: f32,
    /// how many calls matched the track, including the creating one
    ///
    pub frames_seen: usize,
    /// consecutive calls since the last match
    ///
    pub disappeared: usize,
    /// lifecycle state at the moment of the snapshot
    ///
    pub state: TrackState,
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::prelude::*;

    use super::{TrackState, TrackView};
    use crate::utils::bbox::python::PyBoundingBox;

    #[pyclass]
    #[derive(Clone, Debug)]
    #[pyo3(name = "TrackView")]
    pub struct PyTrackView(pub(crate) TrackView);

    #[pymethods]
    impl PyTrackView {
        #[classattr]
        const __hash__: Option<Py<PyAny>> = None;

        fn __repr__(&self) -> String {
            format!("{:?}", self.0)
        }

        fn __str__(&self) -> String {
            format!("{:#?}", self.0)
        }

        #[getter]
        pub fn id(&self) -> u64 {
            self.0.id
        }

        #[getter]
        pub fn class_name(&self) -> String {
            self.0.class_name.clone()
        }

        #[getter]
        pub fn bbox(&self) -> PyBoundingBox {
            PyBoundingBox(self.0.bbox)
        }

        #[getter]
        pub fn confidence(&self) -> f32 {
            self.0.confidence
        }

        #[getter]
        pub fn frames_seen(&self) -> usize {
            self.0.frames_seen
        }

        #[getter]
        pub fn disappeared(&self) -> usize {
            self.0.disappeared
        }

        #[getter]
        pub fn state(&self) -> &'static str {
            match self.0.state {
                TrackState::New => "new",
                TrackState::Tracked => "tracked",
                TrackState::Stale => "stale",
                TrackState::Removed => "removed",
            }
        }
    }
}
