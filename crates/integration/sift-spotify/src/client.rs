//! Spotify Web API client

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use sift_core::{
    CollectionClient, CollectionId, Error, Page, Result, TokenProvider, Track, TrackCandidate,
};

use crate::models::{
    ArtistSummary, PagingObject, PlayHistoryPage, PlayedTrack, PlaylistSummary, PlaylistTrackItem,
    TimeRange, TrackObject,
};

const API_BASE: &str = "https://api.spotify.com/v1";

/// Authenticated client for the Spotify Web API.
///
/// Every call resolves a bearer token through the injected
/// [`TokenProvider`] so refreshes stay invisible to callers.
pub struct SpotifyClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(tokens, API_BASE)
    }

    /// Point the client at a different base URL (tests).
    pub fn with_base_url(tokens: Arc<dyn TokenProvider>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(transport)
    }

    async fn delete(&self, path: &str, body: Option<serde_json::Value>) -> Result<()> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "DELETE");
        let mut request = self.http.delete(&url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(transport)?;
        check_status(response).await?;
        Ok(())
    }

    /// The user's playlists (first 50).
    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let page: PagingObject<PlaylistSummary> = self.get_json("/me/playlists?limit=50").await?;
        Ok(page.items)
    }

    /// Top artists over an affinity window.
    pub async fn top_artists(&self, range: TimeRange, limit: usize) -> Result<Vec<ArtistSummary>> {
        let page: PagingObject<ArtistSummary> = self
            .get_json(&format!(
                "/me/top/artists?time_range={}&limit={limit}",
                range.as_str()
            ))
            .await?;
        Ok(page.items)
    }

    /// Top tracks over an affinity window. Malformed entries are dropped.
    pub async fn top_tracks(&self, range: TimeRange, limit: usize) -> Result<Vec<Track>> {
        let page: PagingObject<TrackObject> = self
            .get_json(&format!(
                "/me/top/tracks?time_range={}&limit={limit}",
                range.as_str()
            ))
            .await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|t| TrackCandidate::from(t).validate())
            .collect())
    }

    /// The listening history, most recent first.
    pub async fn recently_played(&self, limit: usize) -> Result<Vec<PlayedTrack>> {
        let page: PlayHistoryPage = self
            .get_json(&format!("/me/player/recently-played?limit={limit}"))
            .await?;
        Ok(page
            .items
            .into_iter()
            .filter_map(|item| {
                let track = TrackCandidate::from(item.track?).validate()?;
                Some(PlayedTrack {
                    track,
                    played_at: item.played_at,
                })
            })
            .collect())
    }
}

#[async_trait]
impl CollectionClient for SpotifyClient {
    async fn fetch_page(
        &self,
        collection: &CollectionId,
        limit: usize,
        offset: usize,
    ) -> Result<Page> {
        let path = match collection {
            CollectionId::Liked => format!("/me/tracks?limit={limit}&offset={offset}"),
            CollectionId::Playlist(id) => {
                format!("/playlists/{id}/tracks?limit={limit}&offset={offset}")
            }
        };
        let page: PagingObject<PlaylistTrackItem> = self.get_json(&path).await?;
        Ok(Page {
            items: page
                .items
                .into_iter()
                .filter_map(|item| item.track.map(TrackCandidate::from))
                .collect(),
            total: page.total,
        })
    }

    async fn remove(&self, collection: &CollectionId, track: &Track) -> Result<()> {
        match collection {
            CollectionId::Liked => {
                self.delete(&format!("/me/tracks?ids={}", track.id), None)
                    .await
            }
            CollectionId::Playlist(id) => {
                let body = serde_json::json!({
                    "tracks": [{ "uri": track.removal_uri() }]
                });
                self.delete(&format!("/playlists/{id}/tracks"), Some(body))
                    .await
            }
        }
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

/// Map non-success statuses into the shared taxonomy: 401/403 are auth
/// failures, everything else surfaces status and body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(Error::Auth(format!("HTTP {status}: {message}")));
    }
    Err(Error::Http {
        status: status.as_u16(),
        message,
    })
}
