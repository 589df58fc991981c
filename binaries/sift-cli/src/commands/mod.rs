pub mod browse;
pub mod login;
pub mod review;

use std::sync::Arc;

use sift_auth::StoredTokenProvider;
use sift_core::SiftConfig;
use sift_spotify::SpotifyClient;

/// Build an authenticated API client from the cached login.
pub fn client(config: &SiftConfig) -> anyhow::Result<Arc<SpotifyClient>> {
    let tokens = StoredTokenProvider::from_disk(config)?;
    Ok(Arc::new(SpotifyClient::new(Arc::new(tokens))))
}
