//! The relationship resolution pipeline block
//!
//! Composes the definition resolver and the relationship fetcher, then hands
//! the assembled component to the mutation boundary: the input entity is never
//! touched, a fresh copy carries the relationships out of the block.

use crate::fetcher::RelationshipFetcher;
use crate::resolver::DefinitionResolver;
use merx_cache::CacheProvider;
use merx_core::domain::registry::EntityTypeRegistry;
use merx_core::{
    CoreError, Entity, ExecutionContext, IdResolver, ListStore, PipelineBlock,
    RelationshipsComponent,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Name under which the block is registered and configured
pub const GET_RELATIONSHIPS_BLOCK: &str = "GetRelationshipsBlock";

/// Pipeline block that resolves an entity's relationships and attaches them
/// to a copy of the entity
pub struct GetRelationshipsBlock {
    resolver: DefinitionResolver,
    fetcher: RelationshipFetcher,
}

impl GetRelationshipsBlock {
    /// Create the block over the given collaborators
    pub fn new(
        cache_provider: Arc<dyn CacheProvider>,
        list_store: Arc<dyn ListStore>,
        id_resolver: Arc<dyn IdResolver>,
        registry: Arc<EntityTypeRegistry>,
    ) -> Self {
        Self {
            resolver: DefinitionResolver::new(cache_provider, Arc::clone(&list_store)),
            fetcher: RelationshipFetcher::new(list_store, id_resolver, registry),
        }
    }
}

#[async_trait]
impl PipelineBlock for GetRelationshipsBlock {
    fn name(&self) -> &str {
        GET_RELATIONSHIPS_BLOCK
    }

    async fn run(&self, entity: Entity, ctx: &ExecutionContext) -> Result<Entity, CoreError> {
        let definitions = self
            .resolver
            .resolve_definitions(&entity.entity_type, ctx)
            .await?;
        debug!(
            entity = %entity.friendly_id,
            entity_type = %entity.entity_type,
            definitions = definitions.len(),
            "resolving relationships"
        );

        let relationships = self
            .fetcher
            .fetch_relationships(&entity, definitions, ctx)
            .await?;

        attach_relationships(&entity, RelationshipsComponent { relationships })
    }
}

/// Attach the component to a structural copy of the entity.
///
/// The copy's component storage is independent of the original's; an existing
/// relationships component on the copy is replaced. The original entity is
/// left unchanged.
pub fn attach_relationships(
    entity: &Entity,
    component: RelationshipsComponent,
) -> Result<Entity, CoreError> {
    let mut clone = entity.clone();
    clone.set_component(&component)?;
    Ok(clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use merx_core::{Relationship, RelationshipsComponent};

    #[test]
    fn test_attach_leaves_the_original_untouched() {
        let original = Entity::new("id-1", "Roots", "Category", 1);
        let component = RelationshipsComponent {
            relationships: vec![Relationship {
                name: "Children".to_string(),
                related_ids: vec!["Alpha".to_string()],
            }],
        };

        let copy = attach_relationships(&original, component).unwrap();

        assert!(!original.has_component::<RelationshipsComponent>());
        assert!(copy.has_component::<RelationshipsComponent>());
        assert_eq!(copy.friendly_id, original.friendly_id);
    }

    #[test]
    fn test_attach_replaces_existing_component_on_the_copy() {
        let mut original = Entity::new("id-1", "Roots", "Category", 1);
        original
            .set_component(&RelationshipsComponent {
                relationships: vec![Relationship::new("Stale")],
            })
            .unwrap();

        let copy = attach_relationships(
            &original,
            RelationshipsComponent {
                relationships: vec![Relationship::new("Fresh")],
            },
        )
        .unwrap();

        let stored = copy
            .get_component::<RelationshipsComponent>()
            .unwrap()
            .unwrap();
        assert_eq!(stored.relationships.len(), 1);
        assert_eq!(stored.relationships[0].name, "Fresh");

        // The original still carries its stale component.
        let original_stored = original
            .get_component::<RelationshipsComponent>()
            .unwrap()
            .unwrap();
        assert_eq!(original_stored.relationships[0].name, "Stale");
    }

    #[test]
    fn test_mutating_the_copy_does_not_alter_the_original() {
        let original = Entity::new("id-1", "Roots", "Category", 1);
        let mut copy = attach_relationships(
            &original,
            RelationshipsComponent {
                relationships: vec![],
            },
        )
        .unwrap();

        copy.remove_component::<RelationshipsComponent>();
        copy.set_component(&RelationshipsComponent {
            relationships: vec![Relationship::new("New")],
        })
        .unwrap();

        assert_eq!(original.component_count(), 0);
    }
}
