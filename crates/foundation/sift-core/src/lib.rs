//! # Sift Core
//!
//! Shared foundation for the Sift library curator: the track data model,
//! the error taxonomy every layer maps into, the client traits that the
//! integration crates implement, and the user configuration file.
//!
//! Nothing in this crate talks to the network. The `CollectionClient` and
//! `TokenProvider` traits are the seams where sift-spotify and sift-auth
//! plug in, and where tests substitute scripted fakes.

pub mod config;
pub mod traits;
pub mod types;

pub use config::SiftConfig;
pub use traits::{CollectionClient, TokenProvider};
pub use types::{
    CollectionId, CollectionSelection, Decision, Outcome, Page, Progress, Track, TrackCandidate,
};

/// Result type for sift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by any sift layer.
///
/// The remote client maps transport failures to `Network`, 401/403 to
/// `Auth`, and any other non-success status to `Http`. The review engine
/// treats `Auth` as terminal for the current collection and everything
/// else as retryable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Whether a later retry of the same request could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_covers_transient_failures_only() {
        assert!(Error::Network("reset".into()).is_retryable());
        assert!(Error::Http { status: 503, message: String::new() }.is_retryable());
        assert!(Error::Http { status: 429, message: String::new() }.is_retryable());

        assert!(!Error::Http { status: 404, message: String::new() }.is_retryable());
        assert!(!Error::Auth("expired".into()).is_retryable());
        assert!(!Error::Malformed("bad json".into()).is_retryable());
    }
}
