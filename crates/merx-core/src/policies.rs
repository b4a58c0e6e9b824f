//! Policies and the policy set
//!
//! Policies are plain configuration values looked up by type on the execution
//! context. A lookup for a policy that was never configured yields the
//! policy's `Default`, so callers can always read one without checking for
//! presence first.

use merx_cache::CacheEntryOptions;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Marker trait for policy types
pub trait Policy: Any + Send + Sync + Debug {}

/// Caching policy for a cached entity kind.
///
/// The default policy disables caching, so an unconfigured context always
/// takes the fallback query path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityCachePolicy {
    /// Whether caching is allowed for the kind this policy covers
    #[serde(default)]
    pub allow_caching: bool,

    /// Name of the cache to use when caching is allowed
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Optional entry time-to-live in milliseconds
    #[serde(default)]
    pub entry_ttl_ms: Option<u64>,
}

fn default_cache_name() -> String {
    "Entities".to_string()
}

impl Default for EntityCachePolicy {
    fn default() -> Self {
        Self {
            allow_caching: false,
            cache_name: default_cache_name(),
            entry_ttl_ms: None,
        }
    }
}

impl EntityCachePolicy {
    /// A policy that caches into the named cache with the given TTL
    pub fn enabled(cache_name: impl Into<String>, entry_ttl_ms: Option<u64>) -> Self {
        Self {
            allow_caching: true,
            cache_name: cache_name.into(),
            entry_ttl_ms,
        }
    }

    /// Entry options derived from this policy
    pub fn entry_options(&self) -> CacheEntryOptions {
        CacheEntryOptions {
            ttl: self.entry_ttl_ms.map(Duration::from_millis),
            ..CacheEntryOptions::default()
        }
    }
}

impl Policy for EntityCachePolicy {}

/// Names of the well-known lists relationship data lives in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownRelationshipListsPolicy {
    /// List holding all authored relationship definitions
    #[serde(default = "default_definitions_list")]
    pub relationship_definitions: String,
}

fn default_definitions_list() -> String {
    "RelationshipDefinitions".to_string()
}

impl Default for KnownRelationshipListsPolicy {
    fn default() -> Self {
        Self {
            relationship_definitions: default_definitions_list(),
        }
    }
}

impl Policy for KnownRelationshipListsPolicy {}

/// Type-keyed collection of policies attached to an execution context
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    policies: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl PolicySet {
    /// Create an empty policy set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a policy
    pub fn insert<P: Policy + 'static>(&mut self, policy: P) {
        self.policies.insert(TypeId::of::<P>(), Arc::new(policy));
    }

    /// Look up a policy by type, falling back to its default when absent
    pub fn policy<P: Policy + Default + Clone + 'static>(&self) -> P {
        self.policies
            .get(&TypeId::of::<P>())
            .and_then(|policy| policy.downcast_ref::<P>())
            .cloned()
            .unwrap_or_default()
    }
}
