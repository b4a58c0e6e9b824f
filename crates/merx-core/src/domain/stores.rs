//! Collaborator traits for list-backed storage
//!
//! This module defines the query contracts the runtime needs from the hosting
//! system: finding entities in named lists and resolving list membership into
//! friendly identifiers. External crates implement these traits to plug in
//! real storage; in-memory implementations live in [`memory`] for tests.

use crate::context::ExecutionContext;
use crate::CoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Arguments for a find-entities-in-list query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindInListArgs {
    /// Entity type the list members belong to
    pub entity_type: String,

    /// Name of the list to query
    pub list_name: String,

    /// Number of members to skip
    pub skip: usize,

    /// Maximum number of members to return; `None` requests the full range
    pub take: Option<usize>,

    /// Whether to materialize full entity bodies in `items`
    pub load_entities: bool,

    /// Whether to compute the total member count
    pub load_total_count: bool,
}

impl FindInListArgs {
    /// Create arguments loading full entities and the total count
    pub fn new(
        entity_type: impl Into<String>,
        list_name: impl Into<String>,
        skip: usize,
        take: Option<usize>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            list_name: list_name.into(),
            skip,
            take,
            load_entities: true,
            load_total_count: true,
        }
    }

    /// Skip loading entity bodies; only id/version pairs are needed
    pub fn without_entities(mut self) -> Self {
        self.load_entities = false;
        self
    }

    /// Skip computing the total member count
    pub fn without_total_count(mut self) -> Self {
        self.load_total_count = false;
        self
    }
}

/// One list member's identifier and the entity version it refers to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdVersion {
    /// Internal identifier of the member entity
    pub id: String,
    /// Version of the member entity
    pub version: i32,
}

/// Result of a find-entities-in-list query.
///
/// `id_versions` preserves the member order the store returned; `items` is
/// only populated when entity bodies were requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQueryResult {
    /// Materialized entity bodies, when `load_entities` was set
    #[serde(default)]
    pub items: Vec<serde_json::Value>,

    /// Member identifiers with their versions, in store order
    #[serde(default)]
    pub id_versions: Vec<IdVersion>,

    /// Total member count, when `load_total_count` was set
    #[serde(default)]
    pub total_count: Option<usize>,
}

impl ListQueryResult {
    /// Whether the query matched no members
    pub fn is_empty(&self) -> bool {
        self.id_versions.is_empty()
    }
}

/// Queries entities contained in named lists
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Find entities in a list according to `args`
    async fn find_entities_in_list(
        &self,
        args: FindInListArgs,
        ctx: &ExecutionContext,
    ) -> Result<ListQueryResult, CoreError>;
}

/// Resolves list membership into friendly identifiers
#[async_trait]
pub trait IdResolver: Send + Sync {
    /// Resolve the members of `membership` into friendly identifiers,
    /// preserving member order
    async fn resolve_ids(
        &self,
        membership: &ListQueryResult,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>, CoreError>;
}

/// Memory implementations for testing
#[cfg(feature = "testing")]
pub mod memory {
    use super::*;
    use dashmap::DashMap;
    use std::sync::Arc;

    /// In-memory implementation of [`ListStore`].
    ///
    /// Lists are seeded through [`MemoryListStore::add_list`]; entity bodies
    /// through [`MemoryListStore::insert_entity`].
    #[derive(Debug, Default)]
    pub struct MemoryListStore {
        lists: Arc<DashMap<String, Vec<IdVersion>>>,
        entities: Arc<DashMap<String, serde_json::Value>>,
    }

    impl MemoryListStore {
        /// Create an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a list with members, replacing any list of the same name
        pub fn add_list(&self, list_name: impl Into<String>, members: Vec<IdVersion>) {
            self.lists.insert(list_name.into(), members);
        }

        /// Seed an entity body under its internal identifier
        pub fn insert_entity(&self, id: impl Into<String>, body: serde_json::Value) {
            self.entities.insert(id.into(), body);
        }
    }

    #[async_trait]
    impl ListStore for MemoryListStore {
        async fn find_entities_in_list(
            &self,
            args: FindInListArgs,
            _ctx: &ExecutionContext,
        ) -> Result<ListQueryResult, CoreError> {
            let members = self
                .lists
                .get(&args.list_name)
                .map(|entry| entry.clone())
                .unwrap_or_default();

            let total = members.len();
            let id_versions: Vec<IdVersion> = members
                .into_iter()
                .skip(args.skip)
                .take(args.take.unwrap_or(usize::MAX))
                .collect();

            let items = if args.load_entities {
                id_versions
                    .iter()
                    .filter_map(|member| {
                        self.entities.get(&member.id).map(|entry| entry.clone())
                    })
                    .collect()
            } else {
                Vec::new()
            };

            Ok(ListQueryResult {
                items,
                id_versions,
                total_count: args.load_total_count.then_some(total),
            })
        }
    }

    /// In-memory implementation of [`IdResolver`] backed by an
    /// internal-id to friendly-id map
    #[derive(Debug, Default)]
    pub struct MemoryIdResolver {
        friendly_ids: Arc<DashMap<String, String>>,
    }

    impl MemoryIdResolver {
        /// Create an empty resolver
        pub fn new() -> Self {
            Self::default()
        }

        /// Map an internal identifier to its friendly identifier
        pub fn insert(&self, id: impl Into<String>, friendly_id: impl Into<String>) {
            self.friendly_ids.insert(id.into(), friendly_id.into());
        }
    }

    #[async_trait]
    impl IdResolver for MemoryIdResolver {
        async fn resolve_ids(
            &self,
            membership: &ListQueryResult,
            _ctx: &ExecutionContext,
        ) -> Result<Vec<String>, CoreError> {
            membership
                .id_versions
                .iter()
                .map(|member| {
                    self.friendly_ids
                        .get(&member.id)
                        .map(|entry| entry.clone())
                        .ok_or_else(|| {
                            CoreError::IdResolutionError(format!(
                                "no friendly id for entity: {}",
                                member.id
                            ))
                        })
                })
                .collect()
        }
    }

}
