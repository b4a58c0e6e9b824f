//!
//! Merx Relationships - relationship resolution plugin for the Merx platform
//!
//! Given an entity, the plugin determines which relationship definitions apply
//! to its type (through an environment-scoped cache-aside resolver),
//! concurrently discovers the related entity identifiers for each definition,
//! and attaches the assembled relationships component to a fresh copy of the
//! entity. It installs itself into the hosting system's pipelines by replacing
//! the stock relationship block.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The pipeline block and the entity mutation boundary
pub mod block;

/// Concurrent relationship fetching
pub mod fetcher;

/// Plugin registration into pipeline configurations
pub mod plugin;

/// Cache-aside definition resolution
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use block::{attach_relationships, GetRelationshipsBlock, GET_RELATIONSHIPS_BLOCK};
pub use fetcher::RelationshipFetcher;
pub use plugin::{install, STOCK_GET_RELATIONSHIPS_BLOCK};
pub use resolver::{DefinitionResolver, DEFINITIONS_CACHE_KEY_INFIX};
