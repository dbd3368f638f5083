use crate::detection::Detection;
use crate::track::TrackView;
use crate::trackers::counting::{CountingTracker, FrameTracks};
use crate::trackers::options::TrackerOptions;
use anyhow::Result;
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Cloneable handle to a tracker shared between threads
///
/// Every operation holds the tracker lock for its whole duration, so one `advance` always runs
/// to completion before another call observes or changes the tracker.
///
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<CountingTracker>>,
}

impl SharedTracker {
    pub fn new(tracker: CountingTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn with_options(opts: TrackerOptions) -> Result<Self> {
        Ok(Self::new(CountingTracker::with_options(opts)?))
    }

    /// Exclusive access for compound operations
    ///
    pub fn lock(&self) -> MutexGuard<'_, CountingTracker> {
        self.inner
            .lock()
            .expect("Access to tracker must always succeed")
    }

    pub fn advance(&self, detections: &[Detection]) -> FrameTracks {
        self.lock().advance(detections)
    }

    pub fn tracks(&self) -> BTreeMap<u64, TrackView> {
        self.lock().tracks()
    }

    pub fn total_count(&self) -> usize {
        self.lock().total_count()
    }

    pub fn active_count(&self) -> usize {
        self.lock().active_count()
    }

    pub fn class_counts(&self) -> BTreeMap<String, usize> {
        self.lock().class_counts()
    }

    pub fn reset(&self) -> usize {
        self.lock().reset()
    }
}

impl From<CountingTracker> for SharedTracker {
    fn from(tracker: CountingTracker) -> Self {
        Self::new(tracker)
    }
}

/// Independent trackers keyed by a caller-defined session id
///
/// Sessions are created on first use from the options template and share nothing, so calls for
/// different sessions never wait for each other beyond the registry lookup.
///
#[derive(Debug)]
pub struct SessionTrackers {
    opts: TrackerOptions,
    sessions: RwLock<HashMap<u64, SharedTracker>>,
}

impl SessionTrackers {
    /// Creates the registry
    ///
    /// # Parameters
    /// * `opts` - options every new session tracker is created with
    ///
    pub fn new(opts: TrackerOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            sessions: RwLock::new(HashMap::default()),
        })
    }

    /// Tracker of the session, created if missing
    ///
    pub fn session(&self, session_id: u64) -> SharedTracker {
        if let Some(tracker) = self
            .sessions
            .read()
            .expect("Access to sessions must always succeed")
            .get(&session_id)
        {
            return tracker.clone();
        }

        let mut sessions = self
            .sessions
            .write()
            .expect("Access to sessions must always succeed");
        sessions
            .entry(session_id)
            .or_insert_with(|| {
                debug!("New tracking session {}", session_id);
                SharedTracker::new(
                    CountingTracker::with_options(self.opts.clone())
                        .expect("Options are validated by the registry"),
                )
            })
            .clone()
    }

    pub fn contains(&self, session_id: u64) -> bool {
        self.sessions
            .read()
            .expect("Access to sessions must always succeed")
            .contains_key(&session_id)
    }

    /// Ids of the known sessions, ascending
    ///
    pub fn sessions(&self) -> Vec<u64> {
        let mut ids = self
            .sessions
            .read()
            .expect("Access to sessions must always succeed")
            .keys()
            .copied()
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn advance(&self, session_id: u64, detections: &[Detection]) -> FrameTracks {
        self.session(session_id).advance(detections)
    }

    /// Advances several sessions in parallel, one frame each
    ///
    pub fn advance_batch(
        &self,
        batch: &HashMap<u64, Vec<Detection>>,
    ) -> HashMap<u64, FrameTracks> {
        let trackers = batch
            .keys()
            .map(|id| (*id, self.session(*id)))
            .collect::<Vec<_>>();

        trackers
            .into_par_iter()
            .map(|(id, tracker)| {
                let detections = batch.get(&id).map(Vec::as_slice).unwrap_or_default();
                (id, tracker.advance(detections))
            })
            .collect()
    }

    /// Resets the session and returns its total count, `0` for unknown sessions
    ///
    pub fn reset(&self, session_id: u64) -> usize {
        let tracker = self
            .sessions
            .read()
            .expect("Access to sessions must always succeed")
            .get(&session_id)
            .cloned();
        tracker.map(|t| t.reset()).unwrap_or_default()
    }

    /// Drops the session and returns its final total count
    ///
    pub fn remove(&self, session_id: u64) -> Option<usize> {
        let tracker = self
            .sessions
            .write()
            .expect("Access to sessions must always succeed")
            .remove(&session_id)?;
        let total = tracker.total_count();
        debug!("Tracking session {} closed, total={}", session_id, total);
        Some(total)
    }
}
