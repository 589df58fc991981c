//! Client traits: the seams between the engine and the outside world

use async_trait::async_trait;

use crate::types::{CollectionId, Page, Track};
use crate::Result;

/// Paged reads and item mutations against the remote collection store.
///
/// The review engine only ever talks to the remote through this trait,
/// which keeps it testable with scripted fakes and indifferent to which
/// service actually backs it.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Fetch one page of the collection. `total` in the returned page is
    /// the remote's current count for the whole collection.
    async fn fetch_page(
        &self,
        collection: &CollectionId,
        limit: usize,
        offset: usize,
    ) -> Result<Page>;

    /// Remove a track from the collection. Best-effort: callers may fire
    /// this without awaiting durability.
    async fn remove(&self, collection: &CollectionId, track: &Track) -> Result<()>;
}

/// Supplies a bearer token on demand.
///
/// Implementations may refresh behind the scenes. A missing or expired
/// credential is reported as `Error::Auth`, never as an empty token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}
