use crate::detection::Detection;
use crate::track::{Track, TrackView};
use crate::trackers::lifecycle;
use crate::trackers::matching::{greedy_match, Assignment};
use crate::trackers::options::TrackerOptions;
use anyhow::Result;
use itertools::Itertools;
use log::{debug, warn};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Result of a single `advance` call
///
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTracks {
    /// every track kept by the tracker after the call, stale ones included
    ///
    pub tracks: BTreeMap<u64, TrackView>,
    /// how many identities were created during the call
    ///
    pub new_count: usize,
}

/// Greedy IoU tracker that counts distinct objects
///
/// Identities are allocated from a counter starting at `0` and never reused until the session
/// is ended with [`CountingTracker::reset`].
///
#[derive(Debug, Clone)]
pub struct CountingTracker {
    opts: TrackerOptions,
    tracks: BTreeMap<u64, Track>,
    next_id: u64,
    frame: usize,
    class_counts: BTreeMap<String, usize>,
    wasted: Vec<TrackView>,
}

impl CountingTracker {
    /// Creates new tracker
    ///
    /// # Parameters
    /// * `max_disappeared` - how many consecutive calls a track survives without being matched, must be positive
    /// * `iou_threshold` - minimal IoU to match a detection with a track, must lay within `[0.0, 1.0]`
    ///
    pub fn new(max_disappeared: usize, iou_threshold: f32) -> Result<Self> {
        Self::with_options(TrackerOptions::new(max_disappeared, iou_threshold))
    }

    /// Creates new tracker with the full set of options
    ///
    pub fn with_options(opts: TrackerOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            tracks: BTreeMap::default(),
            next_id: 0,
            frame: 0,
            class_counts: BTreeMap::default(),
            wasted: Vec::default(),
        })
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.opts
    }

    /// Changes the eviction threshold. Tracks that already missed more calls than the new
    /// threshold allows are evicted right away.
    ///
    pub fn set_max_disappeared(&mut self, max_disappeared: usize) -> Result<()> {
        let opts = TrackerOptions {
            max_disappeared,
            ..self.opts.clone()
        };
        opts.validate()?;
        self.opts = opts;

        let expired = self
            .tracks
            .values()
            .filter(|t| t.get_disappeared() > max_disappeared)
            .map(|t| t.get_track_id())
            .collect::<Vec<_>>();
        let evicted = expired
            .iter()
            .filter_map(|id| self.tracks.remove(id))
            .collect::<Vec<_>>();
        self.collect_evicted(&evicted);
        Ok(())
    }

    /// Changes the minimal IoU used by subsequent calls
    ///
    pub fn set_iou_threshold(&mut self, iou_threshold: f32) -> Result<()> {
        let opts = TrackerOptions {
            iou_threshold,
            ..self.opts.clone()
        };
        opts.validate()?;
        self.opts = opts;
        Ok(())
    }

    /// Processes the detections of the next frame
    ///
    /// # Parameters
    /// * `detections` - detections received from a detector, in the detector's order
    ///
    pub fn advance(&mut self, detections: &[Detection]) -> FrameTracks {
        self.frame += 1;
        let detections = self.admit(detections);
        let track_ids = self.tracks.keys().copied().collect::<Vec<_>>();

        let assignment = if track_ids.is_empty() || detections.is_empty() {
            Assignment::unmatched(track_ids.len(), detections.len())
        } else {
            let track_boxes = self
                .tracks
                .values()
                .map(|t| *t.get_bbox())
                .collect::<Vec<_>>();
            let detection_boxes = detections.iter().map(|d| d.bbox).collect::<Vec<_>>();
            greedy_match(&track_boxes, &detection_boxes, self.opts.iou_threshold)
        };

        let outcome = lifecycle::apply(
            &mut self.tracks,
            &mut self.next_id,
            &track_ids,
            &detections,
            &assignment,
            self.opts.max_disappeared,
        );

        for id in &outcome.created {
            if let Some(track) = self.tracks.get(id) {
                *self
                    .class_counts
                    .entry(track.get_class_name().to_string())
                    .or_insert(0) += 1;
            }
        }
        self.collect_evicted(&outcome.evicted);

        debug!(
            "Frame {}: detections={}, matched={}, created={}, evicted={}, active={}, total={}",
            self.frame,
            detections.len(),
            outcome.matched.len(),
            outcome.created.len(),
            outcome.evicted.len(),
            self.tracks.len(),
            self.next_id
        );

        FrameTracks {
            tracks: self.tracks(),
            new_count: outcome.created.len(),
        }
    }

    /// Snapshot of the tracks currently kept by the tracker
    ///
    pub fn tracks(&self) -> BTreeMap<u64, TrackView> {
        self.tracks
            .iter()
            .map(|(id, t)| (*id, t.view(self.opts.max_disappeared)))
            .collect()
    }

    /// Amount of identities created in the current session
    ///
    pub fn total_count(&self) -> usize {
        self.next_id as usize
    }

    /// Amount of tracks currently kept by the tracker
    ///
    pub fn active_count(&self) -> usize {
        self.tracks.len()
    }

    /// Amount of identities created per class in the current session
    ///
    pub fn class_counts(&self) -> BTreeMap<String, usize> {
        self.class_counts.clone()
    }

    /// Amount of `advance` calls in the current session
    ///
    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Receive the tracks evicted since the previous call. Requires `collect_wasted`.
    ///
    pub fn wasted(&mut self) -> Vec<TrackView> {
        std::mem::take(&mut self.wasted)
    }

    /// Clears wasted tracks
    pub fn clear_wasted(&mut self) {
        self.wasted.clear();
    }

    /// Ends the session: drops every track and restarts ids from `0`
    ///
    /// Returns the total count of the finished session.
    ///
    pub fn reset(&mut self) -> usize {
        let total = self.total_count();
        debug!(
            "Session reset after {} frames, total={}, classes={:?}",
            self.frame, total, self.class_counts
        );
        self.tracks.clear();
        self.next_id = 0;
        self.frame = 0;
        self.class_counts.clear();
        self.wasted.clear();
        total
    }

    fn collect_evicted(&mut self, evicted: &[Track]) {
        if self.opts.collect_wasted {
            self.wasted.extend(
                evicted
                    .iter()
                    .map(|t| t.view(self.opts.max_disappeared)),
            );
        }
    }

    fn admit<'a>(&self, detections: &'a [Detection]) -> Cow<'a, [Detection]> {
        let mut admitted = Cow::Borrowed(detections);

        if self.opts.min_confidence > 0.0 {
            admitted = Cow::Owned(
                detections
                    .iter()
                    .filter(|d| d.confidence >= self.opts.min_confidence)
                    .cloned()
                    .collect(),
            );
        }

        match self.opts.max_detections {
            Some(limit) if admitted.len() > limit => {
                warn!(
                    "Frame {} carries {} detections, only {} most confident are processed",
                    self.frame,
                    admitted.len(),
                    limit
                );
                let kept = admitted
                    .iter()
                    .enumerate()
                    .sorted_by(|(_, l), (_, r)| {
                        r.confidence
                            .partial_cmp(&l.confidence)
                            .unwrap_or(Ordering::Equal)
                    })
                    .take(limit)
                    .map(|(index, _)| index)
                    .sorted()
                    .collect::<Vec<_>>();
                Cow::Owned(kept.into_iter().map(|i| admitted[i].clone()).collect())
            }
            _ => admitted,
        }
    }
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use std::collections::BTreeMap;

    use super::CountingTracker;
    use crate::detection::python::PyDetection;
    use crate::track::python::PyTrackView;
    use crate::trackers::options::{TrackerOptions, DEFAULT_IOU_THRESHOLD, DEFAULT_MAX_DISAPPEARED};

    #[pyclass]
    #[pyo3(name = "CountingTracker")]
    pub struct PyCountingTracker(pub(crate) CountingTracker);

    #[pymethods]
    impl PyCountingTracker {
        #[new]
        #[pyo3(signature = (max_disappeared = DEFAULT_MAX_DISAPPEARED, iou_threshold = DEFAULT_IOU_THRESHOLD, min_confidence = 0.0, max_detections = None, collect_wasted = false))]
        pub fn new(
            max_disappeared: usize,
            iou_threshold: f32,
            min_confidence: f32,
            max_detections: Option<usize>,
            collect_wasted: bool,
        ) -> PyResult<Self> {
            CountingTracker::with_options(TrackerOptions {
                max_disappeared,
                iou_threshold,
                min_confidence,
                max_detections,
                collect_wasted,
            })
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
        }

        #[pyo3(signature = (detections))]
        pub fn advance(
            &mut self,
            detections: Vec<PyDetection>,
        ) -> (BTreeMap<u64, PyTrackView>, usize) {
            let detections = detections.into_iter().map(|d| d.0).collect::<Vec<_>>();
            let res = self.0.advance(&detections);
            (
                res.tracks
                    .into_iter()
                    .map(|(id, t)| (id, PyTrackView(t)))
                    .collect(),
                res.new_count,
            )
        }

        pub fn tracks(&self) -> BTreeMap<u64, PyTrackView> {
            self.0
                .tracks()
                .into_iter()
                .map(|(id, t)| (id, PyTrackView(t)))
                .collect()
        }

        pub fn total_count(&self) -> usize {
            self.0.total_count()
        }

        pub fn active_count(&self) -> usize {
            self.0.active_count()
        }

        pub fn class_counts(&self) -> BTreeMap<String, usize> {
            self.0.class_counts()
        }

        pub fn current_frame(&self) -> usize {
            self.0.current_frame()
        }

        pub fn wasted(&mut self) -> Vec<PyTrackView> {
            self.0.wasted().into_iter().map(PyTrackView).collect()
        }

        pub fn reset(&mut self) -> usize {
            self.0.reset()
        }
    }
}
