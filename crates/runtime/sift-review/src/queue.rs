//! The locally buffered review queue

use sift_core::Track;

/// Ordered buffer of fetched tracks plus the read cursor.
///
/// Tracks below `current` are decided; the track at `current` (if any)
/// is the active card; everything past it is unseen. `current` never
/// exceeds the queue length.
#[derive(Debug, Default)]
pub struct ReviewQueue {
    tracks: Vec<Track>,
    current: usize,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly admitted tracks to the tail.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    /// The active card, or `None` when the buffer is exhausted.
    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Move past the active card. No-op when nothing is active.
    pub fn advance(&mut self) {
        if self.current < self.tracks.len() {
            self.current += 1;
        }
    }

    /// Index of the active card == number of decided tracks.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Undecided tracks still buffered, the active card included.
    pub fn remaining(&self) -> usize {
        self.tracks.len() - self.current
    }
}
