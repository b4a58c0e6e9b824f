//! Relationship data model
//!
//! A relationship definition states that entities of a source type may relate,
//! under a named relationship, to entities of a target type. Definitions are
//! authored externally and reach the runtime through the list store; they are
//! read-only here.

use crate::domain::entity::EntityComponent;
use serde::{Deserialize, Serialize};

/// Entity kind under which relationship definitions are stored
pub const RELATIONSHIP_DEFINITION_KIND: &str = "RelationshipDefinition";

/// Immutable descriptor of a relationship rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipDefinition {
    /// Name of the relationship, e.g. "Children"
    pub name: String,

    /// Entity type the relationship originates from
    pub source_type: String,

    /// Entity type the relationship points at
    pub target_type: String,
}

impl RelationshipDefinition {
    /// Whether this definition applies to entities of the given type.
    ///
    /// Source types are matched case-insensitively, non-ASCII letters
    /// included.
    pub fn applies_to(&self, entity_type: &str) -> bool {
        self.source_type.to_lowercase() == entity_type.to_lowercase()
    }
}

/// One resolved relationship: a name and the friendly identifiers of the
/// related entities, in the order the identifier resolution produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    /// Name of the relationship
    pub name: String,

    /// Friendly identifiers of the related entities
    #[serde(default)]
    pub related_ids: Vec<String>,
}

impl Relationship {
    /// Create an empty relationship with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            related_ids: Vec::new(),
        }
    }
}

/// Component carrying all relationships resolved for one entity.
///
/// The order of the relationships themselves is not significant; they are
/// collected from concurrently completing fetches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipsComponent {
    /// The resolved relationships
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl EntityComponent for RelationshipsComponent {
    const KIND: &'static str = "Relationships";
}
