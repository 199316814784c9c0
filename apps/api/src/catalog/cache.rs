//! Short-lived cache for catalog reads.
//!
//! Values are JSON strings so both backends hold the same thing. A cache
//! failure is never an error for the caller: it degrades to a miss and the
//! database is asked instead.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

pub const KEY_PREFIX: &str = "catalog:";

pub fn all_banks_key() -> String {
    format!("{KEY_PREFIX}all_banks")
}

pub fn loans_by_type_key(slug: &str) -> String {
    format!("{KEY_PREFIX}loans:{slug}")
}

#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String);
    async fn invalidate(&self, key: &str);
    /// Drops every catalog entry.
    async fn flush(&self);
}

pub async fn get_json<T: DeserializeOwned>(cache: &dyn CatalogCache, key: &str) -> Option<T> {
    let raw = cache.get(key).await?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding unreadable cache entry {key}: {e}");
            cache.invalidate(key).await;
            None
        }
    }
}

pub async fn set_json<T: Serialize + ?Sized>(cache: &dyn CatalogCache, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, raw).await,
        Err(e) => warn!("Not caching {key}: {e}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisCatalogCache {
    client: redis::Client,
    ttl: Duration,
}

impl RedisCatalogCache {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis unavailable, skipping catalog cache: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl CatalogCache for RedisCatalogCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Redis GET {key} failed: {e}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let result: redis::RedisResult<()> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;
        if let Err(e) = result {
            warn!("Redis SET {key} failed: {e}");
        }
    }

    async fn invalidate(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        if let Err(e) = conn.del::<_, ()>(key).await {
            warn!("Redis DEL {key} failed: {e}");
        }
    }

    async fn flush(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let keys: Vec<String> = match conn.keys(format!("{KEY_PREFIX}*")).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Redis KEYS {KEY_PREFIX}* failed: {e}");
                return;
            }
        };
        if keys.is_empty() {
            return;
        }
        if let Err(e) = conn.del::<_, ()>(keys).await {
            warn!("Redis flush of catalog keys failed: {e}");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

struct CachedEntry {
    value: String,
    cached_at: Instant,
}

/// Bounded TTL map used when no Redis URL is configured. When full, the
/// oldest entry is evicted.
pub struct MemoryCatalogCache {
    entries: Mutex<HashMap<String, CachedEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl MemoryCatalogCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[async_trait]
impl CatalogCache for MemoryCatalogCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        let expired = entries.get(key)?.cached_at.elapsed() > self.ttl;
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    async fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock();
        let ttl = self.ttl;
        entries.retain(|_, e| e.cached_at.elapsed() <= ttl);

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.cached_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            CachedEntry {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    async fn invalidate(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    async fn flush(&self) {
        self.entries.lock().clear();
    }
}
