//! Read-only browse commands: playlists, top artists/tracks, history

use sift_core::SiftConfig;
use sift_spotify::TimeRange;

pub async fn playlists(config: &SiftConfig) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let playlists = client.playlists().await?;
    if playlists.is_empty() {
        println!("No playlists found.");
        return Ok(());
    }
    println!("{:<24} {:>6}  NAME", "ID", "TRACKS");
    for playlist in playlists {
        println!(
            "{:<24} {:>6}  {}",
            playlist.id, playlist.track_count, playlist.name
        );
    }
    Ok(())
}

pub async fn top_artists(config: &SiftConfig, range: TimeRange, limit: usize) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let artists = client.top_artists(range, limit).await?;
    for (rank, artist) in artists.iter().enumerate() {
        let genres = if artist.genres.is_empty() {
            String::new()
        } else {
            format!("  ({})", artist.genres.join(", "))
        };
        println!("{:>3}. {}{genres}", rank + 1, artist.name);
    }
    Ok(())
}

pub async fn top_tracks(config: &SiftConfig, range: TimeRange, limit: usize) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let tracks = client.top_tracks(range, limit).await?;
    for (rank, track) in tracks.iter().enumerate() {
        println!("{:>3}. {} - {}", rank + 1, track.name, track.artist);
    }
    Ok(())
}

pub async fn recent(config: &SiftConfig, limit: usize) -> anyhow::Result<()> {
    let client = super::client(config)?;
    let played = client.recently_played(limit).await?;
    for item in played {
        let when = item.played_at.as_deref().unwrap_or("");
        println!("{when}  {} - {}", item.track.name, item.track.artist);
    }
    Ok(())
}
