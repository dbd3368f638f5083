/// Greedy highest-IoU-first association of tracks and detections
pub mod matching;

/// Applies association results to the track table
pub mod lifecycle;

/// Tracker configuration and builder
pub mod options;

/// Counting tracker: ID allocation, track table and session reset
pub mod counting;

/// Thread-safe handles and per-session registry
pub mod shared;

/// Single-threaded actor that owns a tracker
pub mod worker;
