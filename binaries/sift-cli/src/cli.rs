//! Command-line surface

use clap::{Parser, Subcommand};

use sift_spotify::TimeRange;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Swipe-style curation for your Spotify library", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in to Spotify (opens a browser authorization URL)
    Login,

    /// List your playlists
    Playlists,

    /// Review a collection one track at a time, keeping or discarding each
    Review {
        /// Playlist id to review (defaults to Liked Songs)
        #[arg(short, long)]
        playlist: Option<String>,

        /// Record decisions locally without removing anything remotely
        #[arg(long)]
        dry_run: bool,
    },

    /// Your most-listened artists
    TopArtists {
        /// Affinity window: short (~4 weeks), medium (~6 months), long (years)
        #[arg(long, default_value = "medium")]
        range: TimeRange,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Your most-listened tracks
    TopTracks {
        /// Affinity window: short (~4 weeks), medium (~6 months), long (years)
        #[arg(long, default_value = "medium")]
        range: TimeRange,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Recently played tracks
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
