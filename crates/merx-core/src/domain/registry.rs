//! Entity type registry
//!
//! Relationship definitions name their target types as strings. The registry
//! maps those names to descriptors registered at startup, so type resolution
//! is an explicit lookup rather than runtime reflection.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Descriptor of a known entity type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityTypeDescriptor {
    /// Canonical type name, as used in list queries
    pub name: String,
}

impl EntityTypeDescriptor {
    /// Create a descriptor for the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Lookup table from entity type names to descriptors.
///
/// Built once at startup and shared read-mostly afterwards.
#[derive(Debug, Default)]
pub struct EntityTypeRegistry {
    types: DashMap<String, EntityTypeDescriptor>,
}

impl EntityTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the given type names
    pub fn with_types<I, S>(names: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new();
        for name in names {
            registry.register(EntityTypeDescriptor::new(name));
        }
        Arc::new(registry)
    }

    /// Register a type descriptor, replacing any previous one of the same name
    pub fn register(&self, descriptor: EntityTypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Resolve a type name to its descriptor
    pub fn resolve(&self, name: &str) -> Option<EntityTypeDescriptor> {
        self.types.get(name).map(|entry| entry.clone())
    }
}
