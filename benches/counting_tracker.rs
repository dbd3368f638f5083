#![feature(test)]

extern crate test;

use objcount::prelude::{BoundingBox, CountingTracker, Detection, DEFAULT_IOU_THRESHOLD};
use rand::distributions::Uniform;
use rand::prelude::ThreadRng;
use rand::Rng;
use test::Bencher;

#[bench]
fn bench_counting_00010(b: &mut Bencher) {
    bench_counting(10, b);
}

#[bench]
fn bench_counting_00050(b: &mut Bencher) {
    bench_counting(50, b);
}

#[bench]
fn bench_counting_00100(b: &mut Bencher) {
    bench_counting(100, b);
}

struct DriftingBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    drift: Uniform<f32>,
    rng: ThreadRng,
}

impl DriftingBox {
    fn new(x: f32, y: f32, width: f32, height: f32, drift: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            drift: Uniform::new(-drift, drift),
            rng: rand::thread_rng(),
        }
    }

    fn next(&mut self) -> Detection {
        self.x += self.rng.sample(self.drift);
        self.y += self.rng.sample(self.drift);
        Detection::new(
            "object",
            0.9,
            BoundingBox::xywh(self.x, self.y, self.width, self.height),
        )
    }
}

fn bench_counting(objects: usize, b: &mut Bencher) {
    let mut tracker = CountingTracker::new(5, DEFAULT_IOU_THRESHOLD).unwrap();
    let mut iterators = (0..objects)
        .map(|i| DriftingBox::new(100.0 * i as f32, 100.0 * i as f32, 50.0, 50.0, 1.0))
        .collect::<Vec<_>>();

    b.iter(|| {
        let detections = iterators.iter_mut().map(|i| i.next()).collect::<Vec<_>>();
        tracker.advance(&detections)
    });
    eprintln!(
        "Total: {}, active: {}",
        tracker.total_count(),
        tracker.active_count()
    );
}
