//! Review engine orchestration
//!
//! Composes cursor, ledger, queue, prefetch policy, and the swipe tracker
//! into the public review surface. All state sits behind one async mutex
//! and is only ever mutated here; page fetches run as detached tasks that
//! re-enter through [`ReviewEngine::apply_fetch`] with an epoch stamp, so
//! results from an abandoned collection can never leak into the next one.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use sift_core::{
    CollectionClient, CollectionId, CollectionSelection, Decision, Outcome, Progress, SiftConfig,
    Track,
};

use crate::cursor::{DedupLedger, PageCursor};
use crate::gesture::SwipeTracker;
use crate::prefetch::PrefetchPolicy;
use crate::queue::ReviewQueue;
use crate::{Error, Result};

/// Coarse display phase for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial page of an epoch is still in flight
    Loading,
    /// An active card is available
    Ready,
    /// Nothing to show: empty collection or everything reviewed
    Empty,
    /// An error condition is live (the active card, if any, stays usable)
    Error,
}

/// One state snapshot, emitted on every transition: epoch reset, page
/// arrival, decision commit, and error.
#[derive(Debug, Clone)]
pub struct ReviewSnapshot {
    pub phase: Phase,
    pub track: Option<Track>,
    pub progress: Progress,
}

/// Everything scoped to one review epoch, plus the epoch stamp itself.
struct EngineState {
    epoch: u64,
    selection: Option<CollectionSelection>,
    cursor: PageCursor,
    ledger: DedupLedger,
    queue: ReviewQueue,
    tracker: SwipeTracker,
    decisions: Vec<Decision>,
    fetch_in_flight: bool,
    /// Latched on a non-retryable fetch failure; blocks further fetching
    /// until reselect
    fetch_latched: bool,
    last_error: Option<sift_core::Error>,
}

impl EngineState {
    fn snapshot(&self) -> ReviewSnapshot {
        let track = self.queue.current_track().cloned();
        let phase = if self.last_error.is_some() {
            Phase::Error
        } else if track.is_some() {
            Phase::Ready
        } else if self.fetch_in_flight {
            Phase::Loading
        } else {
            Phase::Empty
        };
        ReviewSnapshot {
            phase,
            track,
            progress: Progress {
                reviewed: self.queue.current_index(),
                buffered: self.queue.len(),
                total: self.cursor.total(),
            },
        }
    }
}

/// The review engine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ReviewEngine {
    state: Arc<Mutex<EngineState>>,
    events: broadcast::Sender<ReviewSnapshot>,
    client: Arc<dyn CollectionClient>,
    policy: PrefetchPolicy,
    dry_run: bool,
}

impl ReviewEngine {
    pub fn new(client: Arc<dyn CollectionClient>, config: &SiftConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        let state = EngineState {
            epoch: 0,
            selection: None,
            cursor: PageCursor::new(),
            ledger: DedupLedger::new(),
            queue: ReviewQueue::new(),
            tracker: SwipeTracker::new(config.commit_threshold),
            decisions: Vec::new(),
            fetch_in_flight: false,
            fetch_latched: false,
            last_error: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            events,
            client,
            policy: PrefetchPolicy::new(config.preload_threshold, config.batch_size),
            dry_run: config.dry_run,
        }
    }

    /// Subscribe to the snapshot stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ReviewSnapshot> {
        self.events.subscribe()
    }

    /// The current state as a snapshot, without waiting for a transition.
    pub async fn snapshot(&self) -> ReviewSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Switch to a collection and load its first page.
    ///
    /// Resets ledger, cursor, queue, and decisions, and bumps the epoch so
    /// any fetch still running for the previous collection is discarded on
    /// arrival. Resolves the collection total from the first page.
    pub async fn select_collection(&self, selection: CollectionSelection) -> Result<()> {
        let (epoch, collection) = {
            let mut st = self.state.lock().await;
            st.epoch += 1;
            st.selection = Some(selection.clone());
            st.cursor = PageCursor::new();
            st.ledger = DedupLedger::new();
            st.queue = ReviewQueue::new();
            st.tracker.reset();
            st.decisions.clear();
            st.fetch_in_flight = true;
            st.fetch_latched = false;
            st.last_error = None;
            self.emit(st.snapshot());
            (st.epoch, selection.id.clone())
        };
        info!(%collection, "collection selected");
        self.run_fetch(epoch, collection, 0).await
    }

    /// The track under review, if any.
    pub async fn current_track(&self) -> Option<Track> {
        self.state.lock().await.queue.current_track().cloned()
    }

    /// `(reviewed, buffered, total)` for display. Total is `None` until
    /// the first page of the epoch resolves.
    pub async fn progress(&self) -> Progress {
        self.state.lock().await.snapshot().progress
    }

    /// Decisions committed this epoch, in commit order.
    pub async fn decisions(&self) -> Vec<Decision> {
        self.state.lock().await.decisions.clone()
    }

    /// Discrete decision path: commit an outcome for the active card.
    pub async fn decide(&self, outcome: Outcome) -> Result<Decision> {
        {
            let mut st = self.state.lock().await;
            if st.selection.is_none() {
                return Err(Error::NoSelection);
            }
            st.tracker.press(outcome);
        }
        self.commit(outcome).await
    }

    /// Start a drag gesture on the active card. No-op without one.
    pub async fn begin_gesture(&self) {
        let mut st = self.state.lock().await;
        if st.queue.current_track().is_some() {
            st.tracker.begin();
        }
    }

    /// Update the running drag displacement.
    pub async fn update_gesture(&self, dx: f32) {
        self.state.lock().await.tracker.update(dx);
    }

    /// Release the drag. Commits when the displacement crossed the
    /// threshold, otherwise snaps back with no decision.
    pub async fn release_gesture(&self) -> Result<Option<Decision>> {
        let outcome = self.state.lock().await.tracker.release();
        match outcome {
            Some(outcome) => self.commit(outcome).await.map(Some),
            None => Ok(None),
        }
    }

    /// Apply a committed outcome: record the decision, advance the queue,
    /// fire the remote removal for discards, and check the prefetch rule.
    async fn commit(&self, outcome: Outcome) -> Result<Decision> {
        let (decision, track, collection, fetch) = {
            let mut st = self.state.lock().await;
            let Some(selection) = st.selection.clone() else {
                st.tracker.reset();
                return Err(Error::NoSelection);
            };
            let Some(track) = st.queue.current_track().cloned() else {
                st.tracker.reset();
                return Err(Error::NoActiveTrack);
            };

            let decision = Decision::new(track.id.clone(), outcome);
            st.decisions.push(decision.clone());
            st.queue.advance();
            st.tracker.settle();
            st.last_error = None;

            let fetch = if !st.fetch_latched
                && self.policy.should_fetch(
                    st.queue.remaining(),
                    st.cursor.offset(),
                    st.cursor.total(),
                    st.fetch_in_flight,
                ) {
                st.fetch_in_flight = true;
                Some((st.epoch, st.cursor.offset()))
            } else {
                None
            };

            self.emit(st.snapshot());
            (decision, track, selection.id, fetch)
        };

        debug!(track = %track.id, ?outcome, "decision committed");

        if outcome == Outcome::Discard {
            self.spawn_removal(collection.clone(), track);
        }

        if let Some((epoch, offset)) = fetch {
            let engine = self.clone();
            let collection = collection.clone();
            tokio::spawn(async move {
                // errors are logged and surfaced via the snapshot stream
                let _ = engine.run_fetch(epoch, collection, offset).await;
            });
        }

        Ok(decision)
    }

    /// Fire-and-forget remote removal. Local review progress is already
    /// committed; a failure here leaves the track on the remote, which is
    /// the documented trade-off.
    fn spawn_removal(&self, collection: CollectionId, track: Track) {
        if self.dry_run {
            info!(track = %track.id, "dry run, skipping remote removal");
            return;
        }
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            match client.remove(&collection, &track).await {
                Ok(()) => info!(track = %track.id, %collection, "removed from collection"),
                Err(err) => {
                    warn!(track = %track.id, %collection, %err, "remote removal failed")
                }
            }
        });
    }

    /// Fetch one page and fold it into the epoch it was issued for.
    async fn run_fetch(&self, epoch: u64, collection: CollectionId, offset: usize) -> Result<()> {
        let result = self
            .client
            .fetch_page(&collection, self.policy.batch_size, offset)
            .await;

        let mut st = self.state.lock().await;
        if st.epoch != epoch {
            debug!(epoch, offset, "dropping page from stale epoch");
            return Ok(());
        }
        st.fetch_in_flight = false;

        match result {
            Ok(page) => {
                st.cursor.resolve_total(page.total);
                let raw_count = page.items.len();
                let ledger = &mut st.ledger;
                let admitted: Vec<Track> = page
                    .items
                    .into_iter()
                    .filter_map(|candidate| ledger.admit(candidate))
                    .collect();
                st.cursor.advance(raw_count);
                debug!(
                    offset,
                    raw = raw_count,
                    admitted = admitted.len(),
                    "page ingested"
                );
                st.queue.extend(admitted);
                self.emit(st.snapshot());
                Ok(())
            }
            Err(err) => {
                // an expired token or a vanished playlist will not get
                // better on its own; a flaky wire might
                if !err.is_retryable() {
                    st.fetch_latched = true;
                }
                warn!(offset, %err, "page fetch failed");
                st.last_error = Some(err.clone());
                self.emit(st.snapshot());
                Err(err.into())
            }
        }
    }

    fn emit(&self, snapshot: ReviewSnapshot) {
        // nobody listening is fine
        let _ = self.events.send(snapshot);
    }
}
