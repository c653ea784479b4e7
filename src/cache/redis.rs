/// Shared Redis cache backend
///
/// Payloads are base64-encoded inside a small JSON envelope together with
/// the absolute expiry, and stored with a matching server-side TTL. The
/// wire protocol is not trusted to be byte-transparent, and the server's
/// clock is not trusted either: retrieval re-checks the expiry client-side
/// and deletes the key if it is already past. Every backend failure is
/// soft: a failed read is a miss, a failed write skips caching.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GlueError, GlueResult};

use super::CacheStore;

/// Stored value layout
#[derive(Serialize, Deserialize)]
struct Envelope {
    /// Absolute expiry, unix seconds
    exp: i64,
    /// base64-encoded content
    body: String,
}

/// Redis-backed cache client
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at the given URL
    pub async fn connect(redis_url: &str) -> GlueResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)
            .map_err(|e| GlueError::Cache(format!("Redis client creation failed: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| GlueError::Cache(format!("Redis connection failed: {}", e)))?;

        info!("Redis connection established");

        Ok(Self { connection })
    }

    async fn delete(&self, key: &str) {
        let mut conn = self.connection.clone();
        let result: Result<i64, _> = conn.del(key).await;
        if let Err(e) = result {
            warn!("Redis DELETE failed for {}: {}", key, e);
        }
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<(Vec<u8>, DateTime<Utc>)> {
        let mut conn = self.connection.clone();

        let raw: Option<String> = match conn.get(key).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Redis GET failed for {}: {}", key, e);
                return None;
            }
        };
        let raw = raw?;

        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Corrupt cache envelope for {}: {}", key, e);
                self.delete(key).await;
                return None;
            }
        };

        let expires_at = DateTime::from_timestamp(envelope.exp, 0)?;
        if expires_at <= Utc::now() {
            debug!("cache entry expired server-side not yet reaped: {}", key);
            self.delete(key).await;
            return None;
        }

        match BASE64.decode(&envelope.body) {
            Ok(content) => Some((content, expires_at)),
            Err(e) => {
                warn!("Failed to decode cached content for {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, content: &[u8], expires_at: DateTime<Utc>) {
        let ttl = (expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            // Already stale; a read would evict it immediately anyway
            debug!("skipping cache write of stale entry: {}", key);
            return;
        }

        let envelope = Envelope {
            exp: expires_at.timestamp(),
            body: BASE64.encode(content),
        };
        let value = match serde_json::to_string(&envelope) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize cache envelope for {}: {}", key, e);
                return;
            }
        };

        let mut conn = self.connection.clone();
        let result: Result<(), _> = conn.set_ex(key, value, ttl as u64).await;
        if let Err(e) = result {
            warn!("Redis SET failed for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope {
            exp: 1_700_000_000,
            body: BASE64.encode(b"content bytes"),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.exp, 1_700_000_000);
        assert_eq!(BASE64.decode(&back.body).unwrap(), b"content bytes");
    }

    #[test]
    fn test_envelope_survives_binary_content() {
        let raw: Vec<u8> = (0u8..=255).collect();
        let body = BASE64.encode(&raw);
        assert_eq!(BASE64.decode(&body).unwrap(), raw);
    }

    #[test]
    fn test_corrupt_envelope_is_rejected() {
        assert!(serde_json::from_str::<Envelope>("not json").is_err());
        assert!(BASE64.decode("!!!").is_err());
    }
}
