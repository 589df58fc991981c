//! User configuration
//!
//! Stored as JSON at `<config_dir>/sift/config.json`. The Spotify client
//! id can also come from `SIFT_CLIENT_ID`, which wins over the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default page size for collection fetches
pub const DEFAULT_BATCH_SIZE: usize = 25;
/// Buffered-track count at or below which the next page is prefetched
pub const DEFAULT_PRELOAD_THRESHOLD: usize = 5;
/// Horizontal displacement required to commit a swipe
pub const DEFAULT_COMMIT_THRESHOLD: f32 = 120.0;
/// Loopback port for the OAuth redirect
pub const DEFAULT_REDIRECT_PORT: u16 = 8898;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiftConfig {
    /// Spotify application client id (PKCE public client)
    pub client_id: String,

    /// Port for the loopback OAuth redirect listener
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,

    /// Tracks fetched per page
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Remaining-track threshold that triggers a prefetch
    #[serde(default = "default_preload_threshold")]
    pub preload_threshold: usize,

    /// Swipe displacement required to commit a decision
    #[serde(default = "default_commit_threshold")]
    pub commit_threshold: f32,

    /// When set, Discard decisions are recorded locally but no remote
    /// removal is issued
    #[serde(default)]
    pub dry_run: bool,
}

fn default_redirect_port() -> u16 {
    DEFAULT_REDIRECT_PORT
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_preload_threshold() -> usize {
    DEFAULT_PRELOAD_THRESHOLD
}

fn default_commit_threshold() -> f32 {
    DEFAULT_COMMIT_THRESHOLD
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_port: DEFAULT_REDIRECT_PORT,
            batch_size: DEFAULT_BATCH_SIZE,
            preload_threshold: DEFAULT_PRELOAD_THRESHOLD,
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
            dry_run: false,
        }
    }
}

impl SiftConfig {
    /// Directory holding config.json and the token cache.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sift")
    }

    /// Path of the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from disk, falling back to defaults when no file exists.
    /// `SIFT_CLIENT_ID` overrides the stored client id.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            Self::default()
        };

        if let Ok(id) = std::env::var("SIFT_CLIENT_ID") {
            if !id.is_empty() {
                config.client_id = id;
            }
        }

        Ok(config)
    }

    /// Persist to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir();
        std::fs::create_dir_all(&dir)?;
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::config_path(), text)?;
        Ok(())
    }

    /// The redirect URI registered with the Spotify application.
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.redirect_port)
    }

    /// Fail fast when no client id is configured.
    pub fn require_client_id(&self) -> Result<&str> {
        if self.client_id.is_empty() {
            return Err(Error::Auth(
                "no client id configured; set SIFT_CLIENT_ID or edit config.json".to_string(),
            ));
        }
        Ok(&self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_review_tuning() {
        let config = SiftConfig::default();
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.preload_threshold, 5);
        assert!((config.commit_threshold - 120.0).abs() < f32::EPSILON);
        assert!(!config.dry_run);
    }

    #[test]
    fn redirect_uri_uses_loopback() {
        let config = SiftConfig::default();
        assert_eq!(config.redirect_uri(), "http://127.0.0.1:8898/callback");
    }

    #[test]
    fn missing_client_id_is_an_auth_error() {
        let config = SiftConfig::default();
        assert!(matches!(
            config.require_client_id(),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: SiftConfig =
            serde_json::from_str(r#"{"client_id":"abc"}"#).unwrap();
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.redirect_port, DEFAULT_REDIRECT_PORT);
    }
}
