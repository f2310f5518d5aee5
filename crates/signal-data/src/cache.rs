//! Time-bounded caching for slow lookups.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use signal_core::error::DataError;
use signal_core::traits::FundamentalsSource;
use signal_core::types::Fundamentals;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Shared key/value cache where every entry lives for a fixed TTL.
///
/// Readers never block each other; a writer overwrites the slot. A zero TTL
/// disables the cache.
#[derive(Debug, Clone)]
pub struct DataCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<V: Clone> DataCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Cache key for a symbol and query type, e.g. `overview:AAPL`.
    pub fn key(kind: &str, symbol: &str) -> String {
        format!("{}:{}", kind, symbol.to_ascii_uppercase())
    }

    /// Live value for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| Instant::now() < e.expires_at)
            .map(|e| e.value.clone())
    }

    pub async fn put(&self, key: String, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .write()
            .await
            .insert(key, CacheEntry { value, expires_at });
    }

    /// Drop expired entries.
    pub async fn clear_expired(&self) {
        let now = Instant::now();
        self.entries.write().await.retain(|_, e| e.expires_at > now);
    }

    /// Entry count, expired entries included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Fundamentals lookups memoised for the cache TTL.
///
/// Failed lookups are not cached so the next call retries upstream. Every
/// upstream fetch first sweeps expired entries, so the map only holds
/// symbols seen within one TTL.
pub struct CachedFundamentals<S> {
    inner: S,
    cache: DataCache<Fundamentals>,
}

impl<S: FundamentalsSource> CachedFundamentals<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: DataCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &DataCache<Fundamentals> {
        &self.cache
    }
}

#[async_trait]
impl<S: FundamentalsSource> FundamentalsSource for CachedFundamentals<S> {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        let key = DataCache::<Fundamentals>::key("overview", symbol);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(symbol, "fundamentals cache hit");
            return Ok(hit);
        }

        let fresh = self.inner.fundamentals(symbol).await?;
        self.cache.clear_expired().await;
        self.cache.put(key, fresh.clone()).await;
        Ok(fresh)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
