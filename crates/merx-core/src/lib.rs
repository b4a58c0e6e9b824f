//!
//! Merx Core - Core runtime for the Merx commerce pipeline engine
//!
//! This crate defines the entity domain model, the execution context and
//! policies, the pipeline framework, and the collaborator contracts the
//! hosting system implements. It is the foundation for the Merx plugins.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - core business models, entities, and collaborator traits
pub mod domain;

/// Execution context and cancellation
pub mod context;

/// Error types
pub mod error;

/// Pipeline framework
pub mod pipeline;

/// Policies and policy lookup
pub mod policies;

// Re-export key types
pub use context::{CancellationToken, ExecutionContext};
pub use error::CoreError;

pub use domain::entity::{Entity, EntityComponent, EntityId};
pub use domain::registry::{EntityTypeDescriptor, EntityTypeRegistry};
pub use domain::relationships::{
    Relationship, RelationshipDefinition, RelationshipsComponent, RELATIONSHIP_DEFINITION_KIND,
};
pub use domain::stores::{FindInListArgs, IdResolver, IdVersion, ListQueryResult, ListStore};

pub use pipeline::{BlockRegistry, Pipeline, PipelineBlock, PipelineConfig};
pub use policies::{EntityCachePolicy, KnownRelationshipListsPolicy, Policy, PolicySet};
