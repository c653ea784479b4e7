/// In-process cache backend
///
/// A `RwLock`-guarded map. Reads are concurrent; writes and expiring reads
/// serialize briefly (hold times are O(1) map operations). There is no
/// background sweep: an expired entry stays in memory until the next `get`
/// for its key, which removes it.
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::CacheStore;

struct Entry {
    content: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// Process-lifetime cache; holds nothing across restarts
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<(Vec<u8>, DateTime<Utc>)> {
        // A poisoned lock means a writer panicked mid-insert; treat the
        // whole cache as a miss rather than propagate.
        let expired = {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                None => return None,
                Some(e) if e.expires_at <= Utc::now() => true,
                Some(e) => return Some((e.content.clone(), e.expires_at)),
            }
        };

        if expired {
            debug!("cache entry expired, evicting: {}", key);
            if let Ok(mut entries) = self.entries.write() {
                // Re-check under the write lock; a concurrent set may have
                // replaced the entry with a fresh one.
                if let Some(e) = entries.get(key) {
                    if e.expires_at <= Utc::now() {
                        entries.remove(key);
                    }
                }
            }
        }
        None
    }

    async fn set(&self, key: &str, content: &[u8], expires_at: DateTime<Utc>) {
        if let Ok(mut entries) = self.entries.write() {
            // Last writer wins, no merge
            entries.insert(
                key.to_string(),
                Entry {
                    content: content.to_vec(),
                    expires_at,
                },
            );
        }
    }
}
