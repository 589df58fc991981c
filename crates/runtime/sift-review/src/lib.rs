//! # Sift Review
//!
//! The incremental paginated review engine. A remote collection far larger
//! than memory is fetched in bounded pages, deduplicated into a local
//! queue, and reviewed one track at a time; every committed decision
//! advances the read cursor and may trigger a prefetch of the next page.
//!
//! ## Moving parts
//!
//! - [`PageCursor`] + [`DedupLedger`]: offset bookkeeping and the
//!   id set that keeps overlapping pages from queueing a track twice
//! - [`ReviewQueue`]: the buffered tracks plus the read cursor
//! - [`PrefetchPolicy`]: when to request the next page (backpressure:
//!   buffer depth is traded against request count)
//! - [`SwipeTracker`]: turns a continuous displacement gesture or a
//!   discrete command into a committed Keep/Discard
//! - [`ReviewEngine`]: the orchestrator tying it all together, with a
//!   broadcast stream of [`ReviewSnapshot`]s for the presentation layer
//!
//! All engine state lives behind a single mutex and is mutated only by
//! engine methods, so decisions are totally ordered and pages land in
//! strictly increasing offset order within one epoch.

pub mod cursor;
pub mod engine;
pub mod gesture;
pub mod prefetch;
pub mod queue;

pub use cursor::{DedupLedger, PageCursor};
pub use engine::{Phase, ReviewEngine, ReviewSnapshot};
pub use gesture::{SwipeState, SwipeTracker};
pub use prefetch::PrefetchPolicy;
pub use queue::ReviewQueue;

/// Result type for review-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the review engine
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// `decide` was called with no active track (still loading, empty
    /// collection, or everything already reviewed)
    #[error("no active track to decide on")]
    NoActiveTrack,

    /// No collection has been selected yet
    #[error("no collection selected")]
    NoSelection,

    /// A remote fetch failed
    #[error(transparent)]
    Client(#[from] sift_core::Error),
}
