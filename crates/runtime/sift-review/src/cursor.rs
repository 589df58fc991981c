//! Pagination cursor and dedup ledger
//!
//! Both are scoped to one review epoch: selecting a different collection
//! rebuilds them from scratch.

use std::collections::HashSet;

use sift_core::{Track, TrackCandidate};

/// Tracks the next fetch offset and the remote total.
///
/// `offset` only moves forward. `total` is resolved from the first page
/// of an epoch and then held fixed; the one exception is a downward
/// clamp when the remote turns out to be smaller than it first claimed.
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
    offset: usize,
    total: Option<usize>,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total(&self) -> Option<usize> {
        self.total
    }

    /// More pages remain if the total is still unknown or the offset has
    /// not reached it.
    pub fn has_more(&self) -> bool {
        match self.total {
            None => true,
            Some(total) => self.offset < total,
        }
    }

    /// Fix the total from the first page of the epoch. Later reports are
    /// ignored unless they shrink the collection, which clamps instead
    /// (the remote is assumed stable mid-review, so a shrink only stops
    /// further prefetching; it never removes already-queued tracks).
    pub fn resolve_total(&mut self, reported: usize) {
        match self.total {
            None => self.total = Some(reported),
            Some(known) if reported < known => {
                tracing::warn!(known, reported, "collection shrank mid-review, clamping total");
                self.total = Some(reported);
            }
            Some(_) => {}
        }
    }

    /// Advance past `n` raw items just fetched. A zero-item page while
    /// the cursor still expects more marks the collection exhausted at
    /// the current offset, otherwise the fetch loop would spin.
    pub fn advance(&mut self, n: usize) {
        if n == 0 {
            if self.has_more() {
                tracing::warn!(offset = self.offset, "empty page before reported total, stopping");
                self.total = Some(self.offset);
            }
            return;
        }
        self.offset += n;
    }
}

/// The set of track ids already admitted into the queue this epoch.
///
/// Admission is the single gate: malformed candidates and ids seen
/// before are dropped here, and surviving ids are recorded before the
/// caller appends them, so two overlapping pages can never queue the
/// same track twice.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and admit one candidate. Returns the track if it is both
    /// well-formed and new this epoch.
    pub fn admit(&mut self, candidate: TrackCandidate) -> Option<Track> {
        let track = candidate.validate()?;
        if !self.seen.insert(track.id.clone()) {
            return None;
        }
        Some(track)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
