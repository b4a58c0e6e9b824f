//! Pipeline framework
//!
//! Pipelines are named, ordered lists of blocks that each transform an entity.
//! Which blocks make up a pipeline is configuration: a [`PipelineConfig`]
//! lists block names, and assembly resolves every name to an instance
//! registered in a [`BlockRegistry`]. Plugins customize a pipeline by
//! replacing a block name in the config before assembly.

use crate::context::ExecutionContext;
use crate::domain::entity::Entity;
use crate::CoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// One step of a pipeline: transforms an entity into a new entity
#[async_trait]
pub trait PipelineBlock: Send + Sync {
    /// Unique name the block is registered and configured under
    fn name(&self) -> &str;

    /// Run the block against the entity
    async fn run(&self, entity: Entity, ctx: &ExecutionContext) -> Result<Entity, CoreError>;
}

/// An assembled pipeline, ready to run
pub struct Pipeline {
    name: String,
    blocks: Vec<Arc<dyn PipelineBlock>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("blocks", &self.blocks.iter().map(|b| b.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Pipeline {
    /// Name of the pipeline
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of blocks in the pipeline
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the pipeline has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Run every block in order, threading the entity through.
    ///
    /// The first failing block fails the pipeline. Cancellation is checked
    /// between blocks; the blocks themselves propagate the context's token
    /// into their own collaborator calls.
    pub async fn run(
        &self,
        entity: Entity,
        ctx: &ExecutionContext,
    ) -> Result<Entity, CoreError> {
        let mut current = entity;
        for block in &self.blocks {
            if ctx.cancellation().is_cancelled() {
                return Err(CoreError::Cancelled(format!(
                    "pipeline {} cancelled before block {}",
                    self.name,
                    block.name()
                )));
            }
            debug!(pipeline = %self.name, block = %block.name(), "running pipeline block");
            current = block.run(current, ctx).await?;
        }
        Ok(current)
    }
}

/// Registry of block instances, keyed by block name
#[derive(Default)]
pub struct BlockRegistry {
    blocks: DashMap<String, Arc<dyn PipelineBlock>>,
}

impl BlockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block under its own name, replacing any previous instance
    pub fn register(&self, block: Arc<dyn PipelineBlock>) {
        self.blocks.insert(block.name().to_string(), block);
    }

    /// Look up a block by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn PipelineBlock>> {
        self.blocks.get(name).map(|entry| entry.clone())
    }
}

/// Configuration of one pipeline: its name and its ordered block names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Name of the pipeline
    pub name: String,

    /// Block names, in execution order
    #[serde(default)]
    pub blocks: Vec<String>,
}

impl PipelineConfig {
    /// Create an empty pipeline configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a block name
    pub fn push(mut self, block_name: impl Into<String>) -> Self {
        self.blocks.push(block_name.into());
        self
    }

    /// Replace the block named `old` with `new`, keeping its position.
    ///
    /// Fails when `old` is not part of this pipeline.
    pub fn replace(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        match self.blocks.iter_mut().find(|name| name.as_str() == old) {
            Some(slot) => {
                *slot = new.to_string();
                Ok(())
            }
            None => Err(CoreError::BlockNotFound(format!(
                "{} in pipeline {}",
                old, self.name
            ))),
        }
    }

    /// Resolve every configured block name through the registry and build the
    /// runnable pipeline
    pub fn assemble(&self, registry: &BlockRegistry) -> Result<Pipeline, CoreError> {
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for name in &self.blocks {
            let block = registry
                .get(name)
                .ok_or_else(|| CoreError::BlockNotFound(name.clone()))?;
            blocks.push(block);
        }
        Ok(Pipeline {
            name: self.name.clone(),
            blocks,
        })
    }
}
