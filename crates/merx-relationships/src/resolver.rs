//! Cache-aside resolution of applicable relationship definitions
//!
//! The authored definition list changes rarely but is read on every entity
//! fetch, so resolution goes through an environment-scoped cache: read the
//! cached per-type list when the caching policy allows it, otherwise query
//! the definition list and populate the cache with the filtered result.
//! Concurrent resolutions for the same key may race on population; the write
//! is last-writer-wins and both writers computed the same value.

use merx_cache::{CacheExt, CacheProvider};
use merx_core::{
    CoreError, EntityCachePolicy, ExecutionContext, FindInListArgs, KnownRelationshipListsPolicy,
    ListStore, RelationshipDefinition, RELATIONSHIP_DEFINITION_KIND,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Middle segment of the definition cache key, scoping entries to this
/// resolver's use of the cache
pub const DEFINITIONS_CACHE_KEY_INFIX: &str = "GetRelationshipsBlock.RelationshipDefinition";

/// Resolves the relationship definitions applicable to an entity type,
/// caching per environment and type
pub struct DefinitionResolver {
    cache_provider: Arc<dyn CacheProvider>,
    list_store: Arc<dyn ListStore>,
}

impl DefinitionResolver {
    /// Create a resolver over the given collaborators
    pub fn new(cache_provider: Arc<dyn CacheProvider>, list_store: Arc<dyn ListStore>) -> Self {
        Self {
            cache_provider,
            list_store,
        }
    }

    fn cache_key(environment: &str, entity_type: &str) -> String {
        format!(
            "{}|{}|{}",
            environment, DEFINITIONS_CACHE_KEY_INFIX, entity_type
        )
    }

    /// Resolve the definitions whose source type matches `entity_type`.
    ///
    /// The result is identical whether it came from the cache or from the
    /// fallback query; source types are matched case-insensitively and
    /// definitions for other types never leak in. A failure to populate the
    /// cache is logged and swallowed; the computed definitions are still
    /// returned. Cancellation of the context fails the resolution rather
    /// than letting an in-flight query run to completion.
    pub async fn resolve_definitions(
        &self,
        entity_type: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<RelationshipDefinition>, CoreError> {
        if entity_type.is_empty() {
            return Err(CoreError::InvalidArgument(
                "resolve_definitions: entity type must not be empty".to_string(),
            ));
        }

        let cache_policy: EntityCachePolicy = ctx.policy();
        let cache_key = Self::cache_key(ctx.environment(), entity_type);

        let mut cache = None;
        if cache_policy.allow_caching {
            let instance = self
                .cache_provider
                .environment_cache(&cache_policy.cache_name)
                .await?;
            let cached = tokio::select! {
                _ = ctx.cancellation().cancelled() => {
                    return Err(CoreError::Cancelled(format!(
                        "definition cache read for {}",
                        entity_type
                    )));
                }
                result = instance.get_as::<Vec<RelationshipDefinition>>(&cache_key) => result?,
            };
            if let Some(definitions) = cached {
                debug!(
                    %cache_key,
                    count = definitions.len(),
                    "relationship definitions served from cache"
                );
                return Ok(definitions);
            }
            cache = Some(instance);
        }

        let lists_policy: KnownRelationshipListsPolicy = ctx.policy();
        let args = FindInListArgs::new(
            RELATIONSHIP_DEFINITION_KIND,
            &lists_policy.relationship_definitions,
            0,
            None,
        );
        let result = tokio::select! {
            _ = ctx.cancellation().cancelled() => {
                return Err(CoreError::Cancelled(format!(
                    "definition query for {}",
                    entity_type
                )));
            }
            result = self.list_store.find_entities_in_list(args, ctx) => result?,
        };

        let mut definitions = Vec::with_capacity(result.items.len());
        for item in result.items {
            let definition: RelationshipDefinition = serde_json::from_value(item)?;
            if definition.applies_to(entity_type) {
                definitions.push(definition);
            }
        }

        if let Some(cache) = cache {
            // Population failures must not fail the resolution.
            if let Err(error) = cache
                .put(&cache_key, &definitions, 1, cache_policy.entry_options())
                .await
            {
                warn!(%cache_key, %error, "failed to populate relationship definition cache");
            }
        }

        Ok(definitions)
    }
}
