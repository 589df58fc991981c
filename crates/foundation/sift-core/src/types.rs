//! Track and collection data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reviewable track with stable identity.
///
/// Immutable once fetched. Two tracks with the same `id` are the same
/// logical entity regardless of which page delivered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Spotify track id (base-62)
    pub id: String,
    /// Display name
    pub name: String,
    /// Primary artist name
    pub artist: String,
    /// Album artwork URL, when the remote supplied one
    pub artwork_url: Option<String>,
    /// Spotify URI, used for playlist removal
    pub uri: Option<String>,
}

impl Track {
    /// The URI used by remove calls. Falls back to the canonical
    /// `spotify:track:{id}` form when the wire item lacked one.
    pub fn removal_uri(&self) -> String {
        self.uri
            .clone()
            .unwrap_or_else(|| format!("spotify:track:{}", self.id))
    }
}

/// A track as it arrives off the wire, before validation.
///
/// Every field is optional because the remote occasionally returns null
/// entries (local files, region-withdrawn tracks). `validate` is the
/// single gate between wire shape and the typed `Track`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artists: Vec<String>,
    pub artwork_url: Option<String>,
    pub uri: Option<String>,
}

impl TrackCandidate {
    /// Promote to a `Track` if id, name, and at least one artist are
    /// present. Malformed candidates yield `None` and are dropped
    /// silently at ingest.
    pub fn validate(self) -> Option<Track> {
        let id = self.id.filter(|s| !s.is_empty())?;
        let name = self.name.filter(|s| !s.is_empty())?;
        let artist = self.artists.into_iter().find(|a| !a.is_empty())?;
        Some(Track {
            id,
            name,
            artist,
            artwork_url: self.artwork_url,
            uri: self.uri,
        })
    }
}

/// One page of a remote collection.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<TrackCandidate>,
    /// Total size of the remote collection as reported alongside this page.
    pub total: usize,
}

/// Which remote collection is being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionId {
    /// The user's saved ("liked") tracks
    Liked,
    /// A playlist by Spotify id
    Playlist(String),
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionId::Liked => write!(f, "liked"),
            CollectionId::Playlist(id) => write!(f, "playlist:{id}"),
        }
    }
}

/// The active collection choice. Changing it starts a new review epoch:
/// ledger, cursor, and queue are all rebuilt from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSelection {
    pub id: CollectionId,
    pub name: String,
}

impl CollectionSelection {
    pub fn liked() -> Self {
        Self {
            id: CollectionId::Liked,
            name: "Liked Songs".to_string(),
        }
    }

    pub fn playlist(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CollectionId::Playlist(id.into()),
            name: name.into(),
        }
    }
}

/// The verdict on a single track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Keep,
    Discard,
}

/// A committed per-track decision. Produced exactly once per track,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub track_id: String,
    pub outcome: Outcome,
    pub committed_at: DateTime<Utc>,
}

impl Decision {
    pub fn new(track_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            track_id: track_id.into(),
            outcome,
            committed_at: Utc::now(),
        }
    }
}

/// Review progress for display: how many tracks are decided, how many are
/// buffered locally, and the remote total (unknown until the first page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub reviewed: usize,
    pub buffered: usize,
    pub total: Option<usize>,
}
