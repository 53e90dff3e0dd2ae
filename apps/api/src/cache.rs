//! Response cache: memoizes model replies keyed by a content fingerprint.
//!
//! Caching is a latency optimization only. Backend failures are logged and
//! treated as misses; they never fail a request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::llm_client::{GenerativeModel, LlmError};

const KEY_PREFIX: &str = "screener:reply:";

/// Stable SHA-256 fingerprint over an ordered list of parts.
/// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, value: &str);
}

/// Process-local cache. Entries expire after `ttl`; once `max_entries` is
/// reached the oldest entry is evicted to make room.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, CachedReply>>,
    max_entries: usize,
    ttl: Duration,
}

struct CachedReply {
    value: String,
    stored_at: Instant,
}

impl InMemoryCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries,
            ttl,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let expired = entries.get(key)?.stored_at.elapsed() >= self.ttl;
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|reply| reply.value.clone())
    }

    async fn put(&self, key: &str, value: &str) {
        if self.max_entries == 0 {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            warn!("In-memory cache lock poisoned; skipping insert");
            return;
        };

        let ttl = self.ttl;
        entries.retain(|_, reply| reply.stored_at.elapsed() < ttl);

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, reply)| reply.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!("In-memory cache full; evicting oldest entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            CachedReply {
                value: value.to_string(),
                stored_at: Instant::now(),
            },
        );
    }
}

/// Redis-backed cache shared across processes. Entries expire after `ttl_secs`.
pub struct RedisCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis unavailable, bypassing cache: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ResponseCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(format!("{KEY_PREFIX}{key}")).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Redis GET failed: {e}");
                None
            }
        }
    }

    async fn put(&self, key: &str, value: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };
        let result: redis::RedisResult<()> = conn
            .set_ex(format!("{KEY_PREFIX}{key}"), value, self.ttl_secs)
            .await;
        if let Err(e) = result {
            warn!("Redis SET failed: {e}");
        }
    }
}

/// Cache that never stores anything.
pub struct NoCache;

#[async_trait]
impl ResponseCache for NoCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn put(&self, _key: &str, _value: &str) {}
}

/// Decorator that memoizes a `GenerativeModel` through a `ResponseCache`.
/// Only successful replies are cached.
pub struct CachedModel {
    inner: Arc<dyn GenerativeModel>,
    cache: Arc<dyn ResponseCache>,
}

impl CachedModel {
    pub fn new(inner: Arc<dyn GenerativeModel>, cache: Arc<dyn ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl GenerativeModel for CachedModel {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let key = fingerprint(&[self.inner.model_name(), prompt]);
        if let Some(hit) = self.cache.get(&key).await {
            debug!("Model reply served from cache ({})", &key[..12]);
            return Ok(hit);
        }

        let reply = self.inner.generate(prompt).await?;
        self.cache.put(&key, &reply).await;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl GenerativeModel for CountingModel {
        fn model_name(&self) -> &str {
            "counting"
        }

        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::EmptyContent);
            }
            Ok(format!("reply to {prompt}"))
        }
    }

    #[test]
    fn test_fingerprint_is_stable_and_hex() {
        let a = fingerprint(&["model", "prompt"]);
        assert_eq!(a, fingerprint(&["model", "prompt"]));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_respects_part_boundaries() {
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_in_memory_cache_roundtrip() {
        let cache = InMemoryCache::new(4, HOUR);
        assert!(cache.get("k").await.is_none());
        cache.put("k", "v").await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_in_memory_cache_evicts_oldest_when_full() {
        let cache = InMemoryCache::new(2, HOUR);
        cache.put("a", "1").await;
        std::thread::sleep(Duration::from_millis(2));
        cache.put("b", "2").await;
        std::thread::sleep(Duration::from_millis(2));
        cache.put("c", "3").await;

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.get("b").await.as_deref(), Some("2"));
        assert_eq!(cache.get("c").await.as_deref(), Some("3"));

        // Overwriting an existing key never evicts.
        cache.put("c", "4").await;
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b").await.as_deref(), Some("2"));
        assert_eq!(cache.get("c").await.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn test_in_memory_cache_honours_ttl() {
        let cache = InMemoryCache::new(4, Duration::from_millis(20));
        cache.put("k", "v").await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_cached_model_calls_inner_once_per_prompt() {
        let inner = Arc::new(CountingModel {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let model = CachedModel::new(inner.clone(), Arc::new(InMemoryCache::new(16, HOUR)));

        let first = model.generate("p1").await.unwrap();
        let second = model.generate("p1").await.unwrap();
        model.generate("p2").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_model_does_not_cache_errors() {
        let inner = Arc::new(CountingModel {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cache = Arc::new(InMemoryCache::new(16, HOUR));
        let model = CachedModel::new(inner.clone(), cache.clone());

        assert!(model.generate("p").await.is_err());
        assert!(model.generate("p").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_no_cache_never_hits() {
        NoCache.put("k", "v").await;
        assert!(NoCache.get("k").await.is_none());
    }
}
