//! The published content store.
//!
//! The store holds the current [`ContentSnapshot`] behind a `watch`
//! channel. Readers get an `Arc` to an immutable snapshot and never see a
//! half-built one. Refreshes are serialized: while a cycle is running, one
//! further request is queued and any others are folded into it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use atelier_content::{ContentSnapshot, ResourceDescriptor};

use crate::loader::{load_snapshot, CycleReport};
use crate::source::ContentSource;
use crate::sync_marker::{read_sync_marker, SyncMarker};

/// Result of a [`ContentStore::refresh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call ran the given number of load cycles, including any
    /// follow-up requested while it was running.
    Completed {
        /// Cycles run by this call.
        cycles: usize,
    },
    /// A cycle was already running; a follow-up cycle has been queued.
    Queued,
    /// A cycle was running and a follow-up was already queued.
    Coalesced,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    follow_up: bool,
}

/// Owner of the site content.
pub struct ContentStore {
    source: Arc<dyn ContentSource>,
    descriptor: ResourceDescriptor,
    sync_marker_path: Option<String>,
    sender: watch::Sender<Arc<ContentSnapshot>>,
    refresh_state: Mutex<RefreshState>,
    last_report: Mutex<Option<CycleReport>>,
    sync_marker: Mutex<Option<SyncMarker>>,
    cycles: AtomicU64,
}

impl ContentStore {
    /// Creates a store in the pending state.
    ///
    /// Nothing is fetched until [`refresh`](Self::refresh) or
    /// [`spawn_initial_load`](Self::spawn_initial_load) is called.
    pub fn new(source: Arc<dyn ContentSource>, descriptor: ResourceDescriptor) -> Self {
        let (sender, _) = watch::channel(Arc::new(ContentSnapshot::pending()));
        Self {
            source,
            descriptor,
            sync_marker_path: None,
            sender,
            refresh_state: Mutex::new(RefreshState::default()),
            last_report: Mutex::new(None),
            sync_marker: Mutex::new(None),
            cycles: AtomicU64::new(0),
        }
    }

    /// Read the sync marker at `path` at the start of every cycle.
    pub fn with_sync_marker(mut self, path: impl Into<String>) -> Self {
        self.sync_marker_path = Some(path.into());
        self
    }

    /// The resources fetched by each cycle.
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<ContentSnapshot> {
        self.sender.borrow().clone()
    }

    /// A receiver notified each time a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ContentSnapshot>> {
        self.sender.subscribe()
    }

    /// Report of the most recent completed cycle.
    pub fn last_report(&self) -> Option<CycleReport> {
        lock(&self.last_report).clone()
    }

    /// Sync marker seen by the most recent cycle.
    pub fn sync_marker(&self) -> Option<SyncMarker> {
        lock(&self.sync_marker).clone()
    }

    /// Number of load cycles completed since the store was created.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Start the initial load in the background.
    pub fn spawn_initial_load(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.refresh().await })
    }

    /// Run a full load cycle and publish its snapshot.
    ///
    /// If a cycle is already running this returns immediately: the first
    /// such caller queues one follow-up cycle, later callers are folded
    /// into that follow-up. The caller that started the running cycle also
    /// runs the follow-up before returning.
    pub async fn refresh(&self) -> RefreshOutcome {
        {
            let mut state = lock(&self.refresh_state);
            if state.in_flight {
                if state.follow_up {
                    debug!("refresh already queued");
                    return RefreshOutcome::Coalesced;
                }
                state.follow_up = true;
                debug!("refresh queued behind running cycle");
                return RefreshOutcome::Queued;
            }
            state.in_flight = true;
        }

        let mut guard = InFlightGuard {
            state: &self.refresh_state,
            armed: true,
        };
        let mut cycles = 0;
        loop {
            self.run_cycle().await;
            cycles += 1;

            let finished = {
                let mut state = lock(&self.refresh_state);
                if state.follow_up {
                    state.follow_up = false;
                    false
                } else {
                    state.in_flight = false;
                    true
                }
            };
            if finished {
                guard.armed = false;
                break;
            }
        }
        RefreshOutcome::Completed { cycles }
    }

    async fn run_cycle(&self) {
        let cycle = self.cycles_completed() + 1;
        debug!(cycle, source = %self.source.describe(), "starting content load cycle");

        if let Some(path) = &self.sync_marker_path {
            let marker = read_sync_marker(self.source.as_ref(), path).await;
            if let Some(marker) = &marker {
                info!(last_sync = %marker.last_sync, message = %marker.message, "content sync marker");
            }
            *lock(&self.sync_marker) = marker;
        }

        let (snapshot, report) = load_snapshot(self.source.as_ref(), &self.descriptor).await;
        info!(
            cycle,
            fetched = report.fetched,
            failed = report.failed,
            fallbacks = ?report.fallback_categories,
            full_fallback = report.used_full_fallback,
            "publishing content snapshot"
        );

        // Subscribers woken by the send see this cycle's report and count.
        *lock(&self.last_report) = Some(report);
        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.sender.send_replace(Arc::new(snapshot));
    }
}

/// Clears the refresh flags if a refresh future is dropped mid-cycle.
struct InFlightGuard<'a> {
    state: &'a Mutex<RefreshState>,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock(self.state);
            state.in_flight = false;
            state.follow_up = false;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
