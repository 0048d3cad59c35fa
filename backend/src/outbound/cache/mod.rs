//! In-process feed cache with a fixed time-to-live.
//!
//! Expiry is checked lazily against an injected clock; expired entries are
//! dropped on read and swept on write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{FeedCache, FeedCacheError};

struct Entry {
    body: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// [`FeedCache`] holding rendered bodies in a mutex-guarded map.
pub struct InMemoryFeedCache {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryFeedCache {
    /// Create a cache whose entries live for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedCacheError::Backend`] when `ttl` does not fit a
    /// timestamp delta.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, FeedCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| FeedCacheError::backend(format!("invalid cache ttl: {err}")))?;
        Ok(Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl FeedCache for InMemoryFeedCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, FeedCacheError> {
        let now = self.clock.utc();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| FeedCacheError::backend("feed cache lock poisoned"))?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.body.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), FeedCacheError> {
        let now = self.clock.utc();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| FeedCacheError::backend("feed cache lock poisoned"))?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_owned(),
            Entry {
                body,
                expires_at: now + self.ttl,
            },
        );
        Ok(())
    }
}
