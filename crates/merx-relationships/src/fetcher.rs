//! Concurrent discovery of related entity identifiers
//!
//! Each applicable definition is fetched by its own task: resolve the target
//! type, query the membership of the entity's version-scoped list, and if the
//! list is non-empty resolve the members into friendly identifiers. Tasks
//! complete in no particular order and push into a shared collection; the
//! caller joins all of them before reading it. One failing task fails the
//! whole fetch so a partially-populated result is never observed.

use merx_core::domain::registry::EntityTypeRegistry;
use merx_core::{
    CoreError, Entity, ExecutionContext, FindInListArgs, IdResolver, ListStore, Relationship,
    RelationshipDefinition,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Fetches the relationships of one entity across all applicable definitions
pub struct RelationshipFetcher {
    list_store: Arc<dyn ListStore>,
    id_resolver: Arc<dyn IdResolver>,
    registry: Arc<EntityTypeRegistry>,
}

impl RelationshipFetcher {
    /// Create a fetcher over the given collaborators
    pub fn new(
        list_store: Arc<dyn ListStore>,
        id_resolver: Arc<dyn IdResolver>,
        registry: Arc<EntityTypeRegistry>,
    ) -> Self {
        Self {
            list_store,
            id_resolver,
            registry,
        }
    }

    /// Fetch one relationship per definition, concurrently.
    ///
    /// The order of the returned relationships is unspecified; the identifier
    /// order inside each relationship is the order the resolver produced.
    /// Cancellation of the context fails the whole call rather than yielding
    /// a partial result.
    pub async fn fetch_relationships(
        &self,
        entity: &Entity,
        definitions: Vec<RelationshipDefinition>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Relationship>, CoreError> {
        if entity.friendly_id.is_empty() {
            return Err(CoreError::InvalidArgument(
                "fetch_relationships: the entity must carry a friendly id".to_string(),
            ));
        }
        // Checked up front so a fetch with no definitions to spawn still
        // honors an already-cancelled context.
        if ctx.cancellation().is_cancelled() {
            return Err(CoreError::Cancelled(format!(
                "relationship fetch for {}",
                entity.friendly_id
            )));
        }

        let results = Arc::new(Mutex::new(Vec::with_capacity(definitions.len())));
        let mut handles = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let list_store = Arc::clone(&self.list_store);
            let id_resolver = Arc::clone(&self.id_resolver);
            let registry = Arc::clone(&self.registry);
            let results = Arc::clone(&results);
            let entity = entity.clone();
            let ctx = ctx.clone();

            handles.push(tokio::spawn(async move {
                fetch_definition(
                    definition,
                    entity,
                    list_store,
                    id_resolver,
                    registry,
                    ctx,
                    results,
                )
                .await
            }));
        }

        for joined in futures::future::join_all(handles).await {
            joined
                .map_err(|err| CoreError::Other(format!("relationship task failed: {}", err)))??;
        }

        let mut collected = results.lock().await;
        Ok(std::mem::take(&mut *collected))
    }
}

/// Fetch the relationship for a single definition and push it onto the shared
/// collection
async fn fetch_definition(
    definition: RelationshipDefinition,
    entity: Entity,
    list_store: Arc<dyn ListStore>,
    id_resolver: Arc<dyn IdResolver>,
    registry: Arc<EntityTypeRegistry>,
    ctx: ExecutionContext,
    results: Arc<Mutex<Vec<Relationship>>>,
) -> Result<(), CoreError> {
    // No relationship may be synthesized against a type the runtime does not
    // know about.
    let target = registry
        .resolve(&definition.target_type)
        .ok_or_else(|| CoreError::UnknownEntityType(definition.target_type.clone()))?;

    let list_name =
        entity.versioned_list_name(&format!("{}-{}", definition.name, entity.friendly_id));
    debug!(
        definition = %definition.name,
        %list_name,
        "querying relationship list membership"
    );

    // Only id/version pairs are needed on this path.
    let args = FindInListArgs::new(target.name, list_name, 0, None)
        .without_entities()
        .without_total_count();
    let membership = tokio::select! {
        _ = ctx.cancellation().cancelled() => {
            return Err(CoreError::Cancelled(format!(
                "relationship fetch for {}",
                definition.name
            )));
        }
        result = list_store.find_entities_in_list(args, &ctx) => result?,
    };

    let mut relationship = Relationship::new(&definition.name);
    if !membership.is_empty() {
        let ids = tokio::select! {
            _ = ctx.cancellation().cancelled() => {
                return Err(CoreError::Cancelled(format!(
                    "identifier resolution for {}",
                    definition.name
                )));
            }
            result = id_resolver.resolve_ids(&membership, &ctx) => result?,
        };
        relationship.related_ids.extend(ids);
    }

    results.lock().await.push(relationship);
    Ok(())
}
