//! In-memory implementations of `Cache` and `CacheProvider`
//!
//! Primarily intended for testing and single-process deployments. All data is
//! lost when the instance is dropped.

use crate::{Cache, CacheEntryOptions, CacheProvider, CacheResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// A single stored entry with its weight and optional expiry
#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    #[allow(dead_code)]
    weight: u64,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: serde_json::Value, weight: u64, options: &CacheEntryOptions) -> Self {
        Self {
            value,
            weight,
            expires_at: options.ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// In-memory implementation of [`Cache`]
///
/// Entries are held in a map guarded by an async read-write lock. TTL is
/// checked on read; expired entries are swept lazily on write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    /// Whether the cache holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_value(&self, key: &str) -> CacheResult<Option<serde_json::Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn set_value(
        &self,
        key: &str,
        value: serde_json::Value,
        weight: u64,
        options: CacheEntryOptions,
    ) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired());
        entries.insert(key.to_string(), CacheEntry::new(value, weight, &options));
        Ok(())
    }
}

/// In-memory implementation of [`CacheProvider`]
///
/// Caches are provisioned on first lookup and shared by name afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheProvider {
    caches: Arc<DashMap<String, Arc<InMemoryCache>>>,
}

impl MemoryCacheProvider {
    /// Create a new provider with no caches provisioned
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn environment_cache(&self, name: &str) -> CacheResult<Arc<dyn Cache>> {
        let cache = self
            .caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemoryCache::new()))
            .clone();
        Ok(cache)
    }
}
