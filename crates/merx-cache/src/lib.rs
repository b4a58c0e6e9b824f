//! Merx Cache
//!
//! Provides the keyed cache abstraction used across the Merx platform.
//! The `Cache` trait defines a contract for typed reads and writes against an
//! opaque string-keyed store; `CacheProvider` hands out named cache instances
//! whose lifecycle is owned by the host, not by the callers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Available cache eviction policies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Recently Used - remove the least recently accessed entry first
    LRU,
    /// Least Frequently Used - remove the least frequently accessed entry first
    LFU,
    /// First In First Out - remove the oldest entry first
    FIFO,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::LRU
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::LRU => write!(f, "LRU"),
            EvictionPolicy::LFU => write!(f, "LFU"),
            EvictionPolicy::FIFO => write!(f, "FIFO"),
        }
    }
}

/// Per-entry options supplied at write time.
///
/// The options are opaque to callers populating the cache; how TTL and
/// eviction are honored is up to the concrete implementation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntryOptions {
    /// Optional time-to-live for the entry (None means no expiration)
    pub ttl: Option<Duration>,
    /// Eviction policy the entry participates in
    #[serde(default)]
    pub eviction_policy: EvictionPolicy,
}

impl CacheEntryOptions {
    /// Options with the given time-to-live and the default eviction policy
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }
}

/// Errors that can occur during cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend-specific failure
    #[error("Cache backend error: {0}")]
    BackendError(#[from] anyhow::Error),

    /// The named cache could not be provisioned
    #[error("Cache not available: {0}")]
    CacheNotAvailable(String),

    /// Value could not be (de)serialized
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Unexpected failure
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Contract for a single string-keyed cache instance.
///
/// Values are stored as JSON documents; typed access goes through [`CacheExt`].
/// Implementations must tolerate concurrent readers and writers on the same
/// key - a duplicate write is last-writer-wins and must not corrupt the cache.
#[async_trait]
pub trait Cache: Send + Sync + fmt::Debug {
    /// Read the raw value stored under `key`, if any.
    ///
    /// A missing or expired entry yields `Ok(None)`, not an error.
    async fn get_value(&self, key: &str) -> CacheResult<Option<serde_json::Value>>;

    /// Store `value` under `key` with the given weight and entry options.
    async fn set_value(
        &self,
        key: &str,
        value: serde_json::Value,
        weight: u64,
        options: CacheEntryOptions,
    ) -> CacheResult<()>;
}

/// Typed convenience layer over [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    /// Read and deserialize the value stored under `key`, if any.
    async fn get_as<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get_value(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store `value` under `key`.
    async fn put<T>(
        &self,
        key: &str,
        value: &T,
        weight: u64,
        options: CacheEntryOptions,
    ) -> CacheResult<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value, weight, options).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

/// Hands out named cache instances.
///
/// Provisioning is owned by the host; callers only ever look caches up by the
/// name their caching policy specifies.
#[async_trait]
pub trait CacheProvider: Send + Sync + fmt::Debug {
    /// Get (or lazily provision) the cache registered under `name`.
    async fn environment_cache(&self, name: &str) -> CacheResult<Arc<dyn Cache>>;
}

pub mod memory;
