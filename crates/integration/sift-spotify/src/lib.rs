//! # Sift Spotify
//!
//! The Spotify Web API integration: a thin reqwest client that implements
//! `sift_core::CollectionClient` for saved tracks and playlists, plus the
//! browse endpoints (playlists, top artists/tracks, recently played) used
//! by the CLI outside the review loop.
//!
//! Wire shapes are mirrored loosely with all-optional fields; validation
//! happens downstream at queue ingest, never here.

pub mod client;
pub mod models;

pub use client::SpotifyClient;
pub use models::{ArtistSummary, PlayedTrack, PlaylistSummary, TimeRange};
