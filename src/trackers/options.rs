use crate::trackers::counting::CountingTracker;
use crate::Errors;
use anyhow::Result;

/// Default amount of consecutive missed calls a track survives
pub const DEFAULT_MAX_DISAPPEARED: usize = 5;

/// Default IoU required to accept a match, the value SORT authors use
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.3;

/// Tracker configuration
///
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOptions {
    /// The maximum number of consecutive calls without update while the track is alive
    pub max_disappeared: usize,
    /// The minimal IoU between a track and a detection to match them
    pub iou_threshold: f32,
    /// Detections with lower confidence are dropped before matching
    pub min_confidence: f32,
    /// Upper bound of detections processed per call, the most confident are kept
    pub max_detections: Option<usize>,
    /// Keep evicted tracks until they are fetched with `wasted()`
    pub collect_wasted: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            max_disappeared: DEFAULT_MAX_DISAPPEARED,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            min_confidence: 0.0,
            max_detections: None,
            collect_wasted: false,
        }
    }
}

impl TrackerOptions {
    pub fn new(max_disappeared: usize, iou_threshold: f32) -> Self {
        Self {
            max_disappeared,
            iou_threshold,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_disappeared == 0 {
            return Err(Errors::InvalidConfiguration(
                "max_disappeared must be a positive integer".into(),
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(Errors::InvalidConfiguration(format!(
                "iou_threshold must lay within [0.0, 1.0], got {}",
                self.iou_threshold
            ))
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Errors::InvalidConfiguration(format!(
                "min_confidence must lay within [0.0, 1.0], got {}",
                self.min_confidence
            ))
            .into());
        }

        if self.max_detections == Some(0) {
            return Err(Errors::InvalidConfiguration(
                "max_detections must be a positive integer when set".into(),
            )
            .into());
        }

        Ok(())
    }
}

/// Builder for CountingTracker
///
#[derive(Debug, Clone, Default)]
pub struct TrackerBuilder {
    opts: TrackerOptions,
}

impl TrackerBuilder {
    /// Creates a new builder with default options
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// How many consecutive calls a track may go unmatched before eviction
    ///
    pub fn max_disappeared(mut self, max_disappeared: usize) -> Self {
        self.opts.max_disappeared = max_disappeared;
        self
    }

    /// Minimal IoU required to accept a match
    ///
    pub fn iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.opts.iou_threshold = iou_threshold;
        self
    }

    /// Confidence gate applied to incoming detections
    ///
    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.opts.min_confidence = min_confidence;
        self
    }

    /// Caps the amount of detections processed per call
    ///
    pub fn max_detections(mut self, max_detections: usize) -> Self {
        self.opts.max_detections = Some(max_detections);
        self
    }

    /// Keeps evicted tracks until `wasted()` is called
    ///
    pub fn collect_wasted(mut self, collect_wasted: bool) -> Self {
        self.opts.collect_wasted = collect_wasted;
        self
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.opts
    }

    /// Validates the options and builds the tracker
    ///
    pub fn build(self) -> Result<CountingTracker> {
        CountingTracker::with_options(self.opts)
    }
}
