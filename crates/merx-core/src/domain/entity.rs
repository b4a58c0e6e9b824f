//! The entity aggregate and its capability-style component model
//!
//! Entities carry their state as named components looked up by kind. The
//! runtime never mutates an entity in place; pipeline blocks clone the
//! aggregate and work on the copy.

use crate::CoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Internal storage identifier of an entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntityId(pub String);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed component that can be attached to an entity.
///
/// Components are stored as JSON documents keyed by [`EntityComponent::KIND`];
/// attaching a component of a kind that is already present replaces it.
pub trait EntityComponent: Serialize + DeserializeOwned {
    /// Component kind used as the lookup key on the entity
    const KIND: &'static str;
}

/// A business entity: an opaque aggregate with a type, a friendly identifier,
/// a version, and a set of attached components.
///
/// `Clone` yields a structurally independent copy: the component map is owned,
/// so mutating a clone's components never affects the original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Internal storage identifier
    pub id: EntityId,

    /// Stable, externally addressable identifier
    pub friendly_id: String,

    /// Entity type name, matched against relationship definition source types
    pub entity_type: String,

    /// Current version of the entity
    pub version: i32,

    /// Attached components, keyed by component kind
    #[serde(default)]
    components: BTreeMap<String, serde_json::Value>,
}

impl Entity {
    /// Create a new entity with no components attached
    pub fn new(
        id: impl Into<String>,
        friendly_id: impl Into<String>,
        entity_type: impl Into<String>,
        version: i32,
    ) -> Self {
        Self {
            id: EntityId(id.into()),
            friendly_id: friendly_id.into(),
            entity_type: entity_type.into(),
            version,
            components: BTreeMap::new(),
        }
    }

    /// Attach a component, replacing any component of the same kind
    pub fn set_component<C: EntityComponent>(&mut self, component: &C) -> Result<(), CoreError> {
        let value = serde_json::to_value(component)?;
        self.components.insert(C::KIND.to_string(), value);
        Ok(())
    }

    /// Look up a component by kind
    pub fn get_component<C: EntityComponent>(&self) -> Result<Option<C>, CoreError> {
        match self.components.get(C::KIND) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Whether a component of the given kind is attached
    pub fn has_component<C: EntityComponent>(&self) -> bool {
        self.components.contains_key(C::KIND)
    }

    /// Remove a component by kind
    pub fn remove_component<C: EntityComponent>(&mut self) {
        self.components.remove(C::KIND);
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Derive the version-scoped name of a per-entity list.
    ///
    /// Membership lists are scoped to a specific entity version; the version
    /// is appended to the base list name.
    pub fn versioned_list_name(&self, base: &str) -> String {
        format!("{}-{}", base, self.version)
    }
}
