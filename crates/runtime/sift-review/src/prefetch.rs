//! Prefetch policy
//!
//! Backpressure for page fetching: the engine only reaches ahead of the
//! user's decisions by a bounded buffer, and never issues a second fetch
//! while one is outstanding.

/// Decides, after every index advance, whether to request the next page.
#[derive(Debug, Clone, Copy)]
pub struct PrefetchPolicy {
    /// Undecided-buffer depth at or below which a fetch is triggered
    pub preload_threshold: usize,
    /// Page size requested from the remote
    pub batch_size: usize,
}

impl PrefetchPolicy {
    pub fn new(preload_threshold: usize, batch_size: usize) -> Self {
        Self {
            preload_threshold,
            batch_size: batch_size.max(1),
        }
    }

    /// Fetch when the undecided buffer has drained to the threshold,
    /// the fetch cursor has not reached the remote total, and no fetch
    /// is already in flight.
    ///
    /// The offset is the cursor's, not the queue depth: dropped items
    /// (malformed or duplicate) leave the queue short of the total
    /// forever, and must not keep the tail of the collection fetching.
    pub fn should_fetch(
        &self,
        remaining: usize,
        offset: usize,
        total: Option<usize>,
        in_flight: bool,
    ) -> bool {
        if in_flight {
            return false;
        }
        let Some(total) = total else {
            // total unresolved means the initial load has not finished;
            // that load is the only fetch allowed before it resolves
            return false;
        };
        remaining <= self.preload_threshold && offset < total
    }
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self::new(
            sift_core::config::DEFAULT_PRELOAD_THRESHOLD,
            sift_core::config::DEFAULT_BATCH_SIZE,
        )
    }
}
