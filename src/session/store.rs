//! Key-value session store with per-entry TTL
//!
//! The store only knows keys and serialized values. Every `put` replaces the
//! whole value; there is no compare-and-swap, so concurrent writers race and
//! the last write wins.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::VibeResult;

/// Backing cache for serialized sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: String, ttl: Duration) -> VibeResult<()>;

    /// Fetch the value under `key`; expired entries are absent
    async fn get(&self, key: &str) -> VibeResult<Option<String>>;

    /// Number of live entries
    async fn count(&self) -> VibeResult<usize>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache. Uses tokio's clock so paused-time tests can expire entries.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of entries that have not expired
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &str, value: String, ttl: Duration) -> VibeResult<()> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> VibeResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn count(&self) -> VibeResult<usize> {
        Ok(self.len())
    }
}
