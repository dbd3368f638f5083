use crate::detection::Detection;
use crate::trackers::counting::{CountingTracker, FrameTracks};
use crate::Errors;
use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use log::warn;
use std::collections::BTreeMap;
use std::mem;
use std::thread::{spawn, JoinHandle};

/// Session counters reported by the worker
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub per_class: BTreeMap<String, usize>,
}

enum TrackerCommands {
    Advance {
        detections: Vec<Detection>,
        reply: Sender<FrameTracks>,
    },
    Counts {
        reply: Sender<Counts>,
    },
    Reset {
        reply: Sender<usize>,
    },
    Exit,
}

fn tracker_thread(mut tracker: CountingTracker, rx: Receiver<TrackerCommands>) {
    while let Ok(command) = rx.recv() {
        match command {
            TrackerCommands::Advance { detections, reply } => {
                let res = reply.send(tracker.advance(&detections));
                if let Err(e) = res {
                    warn!("Unable to send frame results to a caller, likely the caller already closed the channel. Error is: {:?}", e);
                }
            }
            TrackerCommands::Counts { reply } => {
                let counts = Counts {
                    total: tracker.total_count(),
                    active: tracker.active_count(),
                    per_class: tracker.class_counts(),
                };
                if let Err(e) = reply.send(counts) {
                    warn!("Unable to send counts to a caller. Error is: {:?}", e);
                }
            }
            TrackerCommands::Reset { reply } => {
                if let Err(e) = reply.send(tracker.reset()) {
                    warn!("Unable to send reset result to a caller. Error is: {:?}", e);
                }
            }
            TrackerCommands::Exit => break,
        }
    }
}

/// Tracker running in a dedicated thread
///
/// Requests are queued in a bounded channel and handled strictly one after another, callers
/// block until their request is processed. When the queue is full, callers block on submission.
///
pub struct TrackerWorker {
    tx: Sender<TrackerCommands>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for TrackerWorker {
    fn drop(&mut self) {
        if let Some(thread) = mem::take(&mut self.thread) {
            // the thread may already be gone, in that case there is nobody to stop
            let _ = self.tx.send(TrackerCommands::Exit);
            if thread.join().is_err() {
                warn!("Tracker thread panicked before shutdown");
            }
        }
    }
}

impl TrackerWorker {
    /// Starts the worker
    ///
    /// # Parameters
    /// * `tracker` - the tracker moved into the worker thread
    /// * `queue_size` - how many requests may wait for processing, at least 1
    ///
    pub fn new(tracker: CountingTracker, queue_size: usize) -> Self {
        let (tx, rx) = crossbeam::channel::bounded(queue_size.max(1));
        let thread = spawn(move || tracker_thread(tracker, rx));
        Self {
            tx,
            thread: Some(thread),
        }
    }

    fn request<T>(&self, command: impl FnOnce(Sender<T>) -> TrackerCommands) -> Result<T> {
        let (reply, result) = crossbeam::channel::bounded(1);
        self.tx
            .send(command(reply))
            .map_err(|_| Errors::WorkerStopped)?;
        Ok(result.recv().map_err(|_| Errors::WorkerStopped)?)
    }

    pub fn advance(&self, detections: Vec<Detection>) -> Result<FrameTracks> {
        self.request(|reply| TrackerCommands::Advance { detections, reply })
    }

    pub fn counts(&self) -> Result<Counts> {
        self.request(|reply| TrackerCommands::Counts { reply })
    }

    pub fn reset(&self) -> Result<usize> {
        self.request(|reply| TrackerCommands::Reset { reply })
    }
}
