//! Port for the rendered home feed cache.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum FeedCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "feed cache backend failure: {message}",
    }
}

/// Time-boxed store of rendered responses.
///
/// Entries expire on their own; nothing invalidates them on writes, so a new
/// post may take up to one TTL to appear.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Read a live entry.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FeedCacheError>;

    /// Store `body` under `key` for the adapter's TTL.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), FeedCacheError>;
}

/// Cache that never stores anything, for deployments with caching disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledFeedCache;

#[async_trait]
impl FeedCache for DisabledFeedCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, FeedCacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _body: Vec<u8>) -> Result<(), FeedCacheError> {
        Ok(())
    }
}
