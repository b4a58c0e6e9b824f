//! Fake collaborators for unit tests
//!
//! Hand-rolled fakes with call counters, so tests can assert how often the
//! collaborators were invoked and with which arguments.

use async_trait::async_trait;
use merx_cache::memory::{InMemoryCache, MemoryCacheProvider};
use merx_cache::{Cache, CacheEntryOptions, CacheError, CacheProvider, CacheResult};
use merx_core::{
    CoreError, ExecutionContext, FindInListArgs, IdResolver, IdVersion, ListQueryResult, ListStore,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A relationship definition as it would come back from the list store
pub fn definition_item(name: &str, source_type: &str, target_type: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "source_type": source_type,
        "target_type": target_type,
    })
}

/// Fake `ListStore` seeded per list name, recording every query
#[derive(Debug, Default)]
pub struct FakeListStore {
    items: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    memberships: Mutex<HashMap<String, Vec<IdVersion>>>,
    failing_lists: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
    recorded: Mutex<Vec<FindInListArgs>>,
    calls: AtomicUsize,
}

impl FakeListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed entity bodies returned for a list when `load_entities` is set
    pub fn set_items(&self, list_name: &str, items: Vec<serde_json::Value>) {
        self.items
            .lock()
            .unwrap()
            .insert(list_name.to_string(), items);
    }

    /// Seed the id/version membership of a list
    pub fn set_membership(&self, list_name: &str, members: Vec<IdVersion>) {
        self.memberships
            .lock()
            .unwrap()
            .insert(list_name.to_string(), members);
    }

    /// Make queries against the given list fail
    pub fn fail_list(&self, list_name: &str) {
        self.failing_lists
            .lock()
            .unwrap()
            .push(list_name.to_string());
    }

    /// Delay every query, for cancellation tests
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All queries issued so far, in order
    pub fn recorded_args(&self) -> Vec<FindInListArgs> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListStore for FakeListStore {
    async fn find_entities_in_list(
        &self,
        args: FindInListArgs,
        _ctx: &ExecutionContext,
    ) -> Result<ListQueryResult, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(args.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .failing_lists
            .lock()
            .unwrap()
            .contains(&args.list_name)
        {
            return Err(CoreError::ListStoreError(format!(
                "injected failure for list: {}",
                args.list_name
            )));
        }

        let id_versions = self
            .memberships
            .lock()
            .unwrap()
            .get(&args.list_name)
            .cloned()
            .unwrap_or_default();
        let items = if args.load_entities {
            self.items
                .lock()
                .unwrap()
                .get(&args.list_name)
                .cloned()
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let total = id_versions.len().max(items.len());

        Ok(ListQueryResult {
            items,
            id_versions,
            total_count: args.load_total_count.then_some(total),
        })
    }
}

/// Fake `IdResolver` with an id to friendly-id map and a call counter
#[derive(Debug, Default)]
pub struct FakeIdResolver {
    friendly_ids: Mutex<HashMap<String, String>>,
    fail_message: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl FakeIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: &str, friendly_id: &str) {
        self.friendly_ids
            .lock()
            .unwrap()
            .insert(id.to_string(), friendly_id.to_string());
    }

    /// Make every resolution fail with the given message
    pub fn fail_with(&self, message: &str) {
        *self.fail_message.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdResolver for FakeIdResolver {
    async fn resolve_ids(
        &self,
        membership: &ListQueryResult,
        _ctx: &ExecutionContext,
    ) -> Result<Vec<String>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_message.lock().unwrap().clone() {
            return Err(CoreError::IdResolutionError(message));
        }

        let friendly_ids = self.friendly_ids.lock().unwrap();
        membership
            .id_versions
            .iter()
            .map(|member| {
                friendly_ids.get(&member.id).cloned().ok_or_else(|| {
                    CoreError::IdResolutionError(format!("no friendly id for: {}", member.id))
                })
            })
            .collect()
    }
}

/// Counting wrapper around the in-memory cache provider
#[derive(Debug, Default)]
pub struct FakeCacheProvider {
    inner: MemoryCacheProvider,
    calls: AtomicUsize,
}

impl FakeCacheProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheProvider for FakeCacheProvider {
    async fn environment_cache(&self, name: &str) -> CacheResult<Arc<dyn Cache>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.environment_cache(name).await
    }
}

/// Cache whose writes always fail; reads delegate to an in-memory cache
#[derive(Debug, Default)]
struct FailingWriteCache {
    inner: InMemoryCache,
}

#[async_trait]
impl Cache for FailingWriteCache {
    async fn get_value(&self, key: &str) -> CacheResult<Option<serde_json::Value>> {
        self.inner.get_value(key).await
    }

    async fn set_value(
        &self,
        _key: &str,
        _value: serde_json::Value,
        _weight: u64,
        _options: CacheEntryOptions,
    ) -> CacheResult<()> {
        Err(CacheError::Unexpected(
            "injected cache write failure".to_string(),
        ))
    }
}

/// Cache whose reads always fail; writes delegate to an in-memory cache
#[derive(Debug, Default)]
struct FailingReadCache {
    inner: InMemoryCache,
}

#[async_trait]
impl Cache for FailingReadCache {
    async fn get_value(&self, _key: &str) -> CacheResult<Option<serde_json::Value>> {
        Err(CacheError::Unexpected(
            "injected cache read failure".to_string(),
        ))
    }

    async fn set_value(
        &self,
        key: &str,
        value: serde_json::Value,
        weight: u64,
        options: CacheEntryOptions,
    ) -> CacheResult<()> {
        self.inner.set_value(key, value, weight, options).await
    }
}

/// Provider handing out caches that reject every read
#[derive(Debug, Default)]
pub struct FailingReadCacheProvider;

impl FailingReadCacheProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for FailingReadCacheProvider {
    async fn environment_cache(&self, _name: &str) -> CacheResult<Arc<dyn Cache>> {
        Ok(Arc::new(FailingReadCache::default()))
    }
}

/// Provider handing out caches that reject every write
#[derive(Debug, Default)]
pub struct FailingWriteCacheProvider;

impl FailingWriteCacheProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for FailingWriteCacheProvider {
    async fn environment_cache(&self, _name: &str) -> CacheResult<Arc<dyn Cache>> {
        Ok(Arc::new(FailingWriteCache::default()))
    }
}
