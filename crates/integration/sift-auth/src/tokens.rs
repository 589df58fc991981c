//! Token cache and the refreshing `TokenProvider`
//!
//! Tokens live as JSON next to the config file. The provider hands out
//! the cached access token until it nears expiry, then swaps it for a
//! fresh one using the refresh token, all behind the trait.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sift_core::{Error, Result, SiftConfig, TokenProvider};

use crate::flow::{refresh_token, TokenResponse};

/// Refresh this long before the reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCache {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenCache {
    pub fn from_response(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in as i64),
        }
    }

    /// Fold a refresh response into the cache. Spotify omits the refresh
    /// token on refresh grants, in which case the old one stays.
    pub fn update_from(&mut self, response: TokenResponse) {
        self.expires_at = Utc::now() + Duration::seconds(response.expires_in as i64);
        self.access_token = response.access_token;
        if response.refresh_token.is_some() {
            self.refresh_token = response.refresh_token;
        }
    }

    /// Expired, or close enough that a request might outlive the token.
    pub fn needs_refresh(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    pub fn path() -> PathBuf {
        SiftConfig::config_dir().join("tokens.json")
    }

    pub fn load() -> Result<Option<Self>> {
        let path = Self::path();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(SiftConfig::config_dir())?;
        std::fs::write(Self::path(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// `TokenProvider` over the on-disk cache, refreshing transparently.
pub struct StoredTokenProvider {
    client_id: String,
    http: reqwest::Client,
    cache: tokio::sync::Mutex<TokenCache>,
}

impl StoredTokenProvider {
    pub fn new(client_id: impl Into<String>, cache: TokenCache) -> Self {
        Self {
            client_id: client_id.into(),
            http: reqwest::Client::new(),
            cache: tokio::sync::Mutex::new(cache),
        }
    }

    /// Load the cached login, failing with an auth error when there is
    /// none.
    pub fn from_disk(config: &SiftConfig) -> Result<Self> {
        let client_id = config.require_client_id()?.to_string();
        let cache = TokenCache::load()?
            .ok_or_else(|| Error::Auth("not logged in; run `sift login` first".to_string()))?;
        Ok(Self::new(client_id, cache))
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn bearer_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if !cache.needs_refresh() {
            return Ok(cache.access_token.clone());
        }

        let refresh = cache
            .refresh_token
            .clone()
            .ok_or_else(|| Error::Auth("access token expired and no refresh token cached".to_string()))?;
        debug!("access token stale, refreshing");
        let response = refresh_token(&self.http, &self.client_id, &refresh).await?;
        cache.update_from(response);
        if let Err(err) = cache.save() {
            // losing the persisted copy only costs a re-login later
            warn!(%err, "could not persist refreshed tokens");
        }
        Ok(cache.access_token.clone())
    }
}
