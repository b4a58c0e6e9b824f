//! Domain layer - entities, components, relationship model, and the
//! collaborator contracts the runtime consumes

/// The entity aggregate and component model
pub mod entity;

/// Entity type registry
pub mod registry;

/// Relationship definitions, relationships, and their component
pub mod relationships;

/// List store and identifier resolution collaborator traits
pub mod stores;
