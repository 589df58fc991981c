//! Swipe decision state machine
//!
//! Converts a continuous horizontal displacement stream (or a discrete
//! button press) into a committed Keep/Discard. Rendering and animation
//! live elsewhere; this tracker only cares about displacement values.

use sift_core::Outcome;

/// Lifecycle of one decision gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeState {
    /// No gesture in progress
    Idle,
    /// A drag is in progress; carries the running horizontal displacement
    Tracking { dx: f32 },
    /// Displacement crossed the commit threshold on release; the exit
    /// transition is conceptually running
    Committing(Outcome),
    /// The decision has been applied and the tracker reset
    Settled,
}

/// Tracks one card's gesture at a time.
///
/// Only the active card may be in `Tracking`/`Committing`; the engine
/// resets the tracker whenever the active card changes, so a stale
/// gesture can never commit against the wrong track.
#[derive(Debug)]
pub struct SwipeTracker {
    state: SwipeState,
    commit_threshold: f32,
}

impl SwipeTracker {
    pub fn new(commit_threshold: f32) -> Self {
        Self {
            state: SwipeState::Idle,
            commit_threshold,
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Begin a drag. Restarts tracking from zero displacement if one was
    /// already in progress.
    pub fn begin(&mut self) {
        self.state = SwipeState::Tracking { dx: 0.0 };
    }

    /// Update the running displacement. Ignored unless tracking.
    pub fn update(&mut self, dx: f32) {
        if matches!(self.state, SwipeState::Tracking { .. }) {
            self.state = SwipeState::Tracking { dx };
        }
    }

    /// Release the drag. Past the threshold this commits: negative
    /// displacement discards, positive keeps. Short of it the tracker
    /// snaps back to `Idle` with no decision.
    pub fn release(&mut self) -> Option<Outcome> {
        let SwipeState::Tracking { dx } = self.state else {
            return None;
        };
        if dx.abs() > self.commit_threshold {
            let outcome = if dx < 0.0 {
                Outcome::Discard
            } else {
                Outcome::Keep
            };
            self.state = SwipeState::Committing(outcome);
            Some(outcome)
        } else {
            self.state = SwipeState::Idle;
            None
        }
    }

    /// Discrete input path: buttons bypass `Tracking` entirely.
    pub fn press(&mut self, outcome: Outcome) -> Outcome {
        self.state = SwipeState::Committing(outcome);
        outcome
    }

    /// Mark the committed decision as applied. The tracker stays in
    /// `Settled` until the next gesture or reset replaces it.
    pub fn settle(&mut self) {
        self.state = SwipeState::Settled;
    }

    /// Abandon any gesture in progress (active card changed underneath).
    pub fn reset(&mut self) {
        self.state = SwipeState::Idle;
    }
}
