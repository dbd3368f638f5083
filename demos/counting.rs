use log::info;
use objcount::prelude::{BoundingBox, Detection, TrackerBuilder};

/// Two apples roll through the frame, one pear appears for a moment and the detector misses
/// the first apple for two frames.
///
fn frames() -> Vec<Vec<Detection>> {
    (0..12)
        .map(|i| {
            let shift = i as f32 * 2.0;
            let mut frame = Vec::default();
            if !(4..6).contains(&i) {
                frame.push(Detection::new(
                    "apple",
                    0.9,
                    BoundingBox::xywh(10.0 + shift, 10.0, 40.0, 40.0),
                ));
            }
            frame.push(Detection::new(
                "apple",
                0.8,
                BoundingBox::xywh(200.0 - shift, 100.0, 40.0, 40.0),
            ));
            if i == 6 {
                frame.push(Detection::new(
                    "pear",
                    0.6,
                    BoundingBox::xywh(400.0, 300.0, 30.0, 50.0),
                ));
            }
            frame
        })
        .collect()
}

fn main() {
    env_logger::init();

    let mut tracker = TrackerBuilder::new()
        .max_disappeared(3)
        .iou_threshold(0.3)
        .min_confidence(0.25)
        .collect_wasted(true)
        .build()
        .expect("Options are valid");

    for detections in frames() {
        let res = tracker.advance(&detections);
        info!(
            "Frame {}: new={}, active={:?}",
            tracker.current_frame(),
            res.new_count,
            res.tracks.keys().collect::<Vec<_>>()
        );
        for track in tracker.wasted() {
            info!("Track {} ({}) left the scene", track.id, track.class_name);
        }
    }

    eprintln!("Total: {}", tracker.total_count());
    eprintln!("Per class: {:#?}", tracker.class_counts());
    eprintln!("Session closed with {} objects", tracker.reset());
}
