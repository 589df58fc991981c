//! Wire-shape mirrors of the Spotify Web API
//!
//! Deserialization is deliberately permissive: the API returns null
//! tracks for local files and region-withdrawn content, so everything is
//! optional here and filtered at ingest.

use serde::Deserialize;

use sift_core::TrackCandidate;

/// Generic Spotify paging envelope.
#[derive(Debug, Deserialize)]
pub struct PagingObject<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

/// An entry of `/me/tracks` or `/playlists/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrackObject {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    pub album: Option<AlbumObject>,
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ArtistObject {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AlbumObject {
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<TrackObject> for TrackCandidate {
    fn from(track: TrackObject) -> Self {
        TrackCandidate {
            id: track.id,
            name: track.name,
            artists: track
                .artists
                .into_iter()
                .filter_map(|a| a.name)
                .collect(),
            // first image is the largest per API contract
            artwork_url: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            uri: track.uri,
        }
    }
}

/// An entry of `/me/playlists`, reduced to what the CLI shows.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "tracks", deserialize_with = "track_count", default)]
    pub track_count: usize,
}

fn track_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct TracksRef {
        #[serde(default)]
        total: usize,
    }
    Ok(Option::<TracksRef>::deserialize(deserializer)?
        .map(|t| t.total)
        .unwrap_or(0))
}

/// An entry of `/me/top/artists`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSummary {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

/// An entry of `/me/player/recently-played`.
#[derive(Debug, Deserialize)]
pub struct PlayedTrackItem {
    pub track: Option<TrackObject>,
    pub played_at: Option<String>,
}

/// A recently played track, flattened for display.
#[derive(Debug, Clone)]
pub struct PlayedTrack {
    pub track: sift_core::Track,
    pub played_at: Option<String>,
}

/// Envelope of `/me/player/recently-played` (cursor-paged, not offset-paged).
#[derive(Debug, Deserialize)]
pub struct PlayHistoryPage {
    #[serde(default = "Vec::new")]
    pub items: Vec<PlayedTrackItem>,
}

/// Affinity window for the top artists/tracks endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// ~4 weeks
    Short,
    /// ~6 months
    #[default]
    Medium,
    /// years
    Long,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Short => "short_term",
            TimeRange::Medium => "medium_term",
            TimeRange::Long => "long_term",
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" | "short_term" => Ok(TimeRange::Short),
            "medium" | "medium_term" => Ok(TimeRange::Medium),
            "long" | "long_term" => Ok(TimeRange::Long),
            other => Err(format!("unknown time range: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_tracks_page_parses() {
        let json = r#"{
            "items": [
                {"track": {"id": "t1", "name": "Song One",
                           "artists": [{"id": "a1", "name": "Artist"}],
                           "album": {"images": [{"url": "https://img/640", "width": 640, "height": 640},
                                                {"url": "https://img/300", "width": 300, "height": 300}]},
                           "uri": "spotify:track:t1"}},
                {"track": null}
            ],
            "total": 1234
        }"#;
        let page: PagingObject<PlaylistTrackItem> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 1234);
        assert_eq!(page.items.len(), 2);

        let candidate: TrackCandidate = page.items.into_iter().next().unwrap().track.unwrap().into();
        let track = candidate.validate().unwrap();
        assert_eq!(track.id, "t1");
        assert_eq!(track.artist, "Artist");
        assert_eq!(track.artwork_url.as_deref(), Some("https://img/640"));
    }

    #[test]
    fn null_track_yields_empty_candidate() {
        let item: PlaylistTrackItem = serde_json::from_str(r#"{"track": null}"#).unwrap();
        assert!(item.track.is_none());
    }

    #[test]
    fn track_missing_fields_survives_parse_but_fails_validation() {
        let json = r#"{"id": "x", "artists": []}"#;
        let track: TrackObject = serde_json::from_str(json).unwrap();
        let candidate: TrackCandidate = track.into();
        assert!(candidate.validate().is_none());
    }

    #[test]
    fn playlist_summary_reads_nested_track_count() {
        let json = r#"{"id": "p1", "name": "Road Trip", "tracks": {"total": 42, "href": "x"}}"#;
        let playlist: PlaylistSummary = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.track_count, 42);

        let no_tracks = r#"{"id": "p2", "name": "Empty"}"#;
        let playlist: PlaylistSummary = serde_json::from_str(no_tracks).unwrap();
        assert_eq!(playlist.track_count, 0);
    }

    #[test]
    fn time_range_round_trips() {
        assert_eq!(TimeRange::Short.as_str(), "short_term");
        assert_eq!("medium".parse::<TimeRange>().unwrap(), TimeRange::Medium);
        assert!("decade".parse::<TimeRange>().is_err());
    }
}
