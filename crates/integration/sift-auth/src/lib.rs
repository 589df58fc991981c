//! # Sift Auth
//!
//! One PKCE authorization-code flow for the Spotify accounts service:
//! challenge generation, a one-shot loopback listener for the redirect,
//! code exchange, and a disk-backed token cache that refreshes
//! transparently behind the `TokenProvider` trait.

pub mod flow;
pub mod pkce;
pub mod tokens;

pub use flow::{authorize_url, complete_login, OAUTH_SCOPES};
pub use pkce::PkceChallenge;
pub use tokens::{StoredTokenProvider, TokenCache};
