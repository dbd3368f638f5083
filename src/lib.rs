//! Greedy IoU counting tracker.
//!
//! The crate receives per-frame detections produced by an external detector and assigns
//! persistent identities to the objects behind them, so that every physical object is
//! counted once while it stays in view.
//!
//! ```
//! use objcount::prelude::*;
//!
//! let mut tracker = CountingTracker::new(2, DEFAULT_IOU_THRESHOLD).unwrap();
//! let frame = tracker.advance(&[Detection::new("apple", 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0))]);
//! assert_eq!(frame.new_count, 1);
//! assert_eq!(tracker.total_count(), 1);
//! ```

/// Domain objects passed to the tracker and returned from it
pub mod detection;
pub mod prelude;
pub mod track;
pub mod trackers;
pub mod utils;

#[cfg(feature = "python")]
mod py;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Errors {
    #[error("Invalid tracker configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Tracker worker is stopped.")]
    WorkerStopped,
}

pub(crate) const EPS: f32 = 0.00001;

/// Approximate equality for float-based structures
///
pub trait EstimateClose {
    fn almost_same(&self, other: &Self, eps: f32) -> bool;
}
