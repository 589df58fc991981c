//! sift: swipe-style curation for a Spotify library

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // keep stdout clean for the review UI; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = sift_core::SiftConfig::load()?;

    match cli.command {
        Command::Login => commands::login::run(&config).await,
        Command::Playlists => commands::browse::playlists(&config).await,
        Command::Review { playlist, dry_run } => {
            commands::review::run(config, playlist, dry_run).await
        }
        Command::TopArtists { range, limit } => {
            commands::browse::top_artists(&config, range, limit).await
        }
        Command::TopTracks { range, limit } => {
            commands::browse::top_tracks(&config, range, limit).await
        }
        Command::Recent { limit } => commands::browse::recent(&config, limit).await,
    }
}
