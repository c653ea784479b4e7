/// Caching layer
///
/// Byte-content cache with per-entry absolute expiry, behind one trait with
/// two interchangeable backends:
/// - in-process map (default)
/// - shared Redis backend (selected when `REDIS_URL` is configured)
///
/// Caching is always a soft-failure optimization: backend errors surface as
/// misses on `get` and as skipped writes on `set`, never as request failures.
pub mod memory;
pub mod policy;
pub mod redis;

pub use memory::MemoryCache;
pub use policy::{combine, decide, http_date, CacheDecision};
pub use redis::RedisCache;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Cache key namespaces, one per logical resource kind
pub mod namespaces {
    pub const HCARD: &str = "hcard";
    pub const PHOTO: &str = "photo";
    pub const OG: &str = "og";
    pub const PAGEINFO: &str = "pageinfo";
}

/// Build the cache key for a (namespace, url) pair.
///
/// Distinct semantic requests must never collide, so the namespace tag is
/// part of the key: `"<namespace>=<url>"`.
pub fn cache_key(namespace: &str, url: &str) -> String {
    format!("{}={}", namespace, url)
}

/// Capability set shared by both backends
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a key. Returns the stored content and its expiry, or `None`
    /// on a miss. An entry past its expiry is a miss and is removed.
    async fn get(&self, key: &str) -> Option<(Vec<u8>, DateTime<Utc>)>;

    /// Store content under a key until `expires_at`. Overwrites
    /// unconditionally; errors are swallowed (fire-and-forget).
    async fn set(&self, key: &str, content: &[u8], expires_at: DateTime<Utc>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(
            cache_key(namespaces::HCARD, "https://example.com/"),
            "hcard=https://example.com/"
        );
        assert_eq!(cache_key(namespaces::PHOTO, "x"), "photo=x");
    }

    #[test]
    fn test_cache_keys_distinct_across_namespaces() {
        let url = "https://example.com/";
        let a = cache_key(namespaces::HCARD, url);
        let b = cache_key(namespaces::PAGEINFO, url);
        assert_ne!(a, b);
    }
}
