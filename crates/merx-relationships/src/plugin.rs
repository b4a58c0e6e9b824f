//! Plugin wiring
//!
//! Registers the relationship block and splices it into the hosting system's
//! pipeline configurations, replacing the stock block of the same role where
//! a pipeline carries one.

use crate::block::{GetRelationshipsBlock, GET_RELATIONSHIPS_BLOCK};
use merx_core::{BlockRegistry, CoreError, PipelineConfig};
use std::sync::Arc;
use tracing::info;

/// Name of the stock relationship block this plugin replaces
pub const STOCK_GET_RELATIONSHIPS_BLOCK: &str = "Catalog.GetRelationshipsBlock";

/// Register the block and replace the stock block in every pipeline
/// configuration whose name appears in `pipelines`.
///
/// Fails when a named pipeline does not carry the stock block; pipelines not
/// listed are left alone.
pub fn install(
    registry: &BlockRegistry,
    configs: &mut [PipelineConfig],
    pipelines: &[&str],
    block: Arc<GetRelationshipsBlock>,
) -> Result<(), CoreError> {
    registry.register(block);

    for config in configs
        .iter_mut()
        .filter(|config| pipelines.contains(&config.name.as_str()))
    {
        config.replace(STOCK_GET_RELATIONSHIPS_BLOCK, GET_RELATIONSHIPS_BLOCK)?;
        info!(
            pipeline = %config.name,
            "replaced {} with {}",
            STOCK_GET_RELATIONSHIPS_BLOCK,
            GET_RELATIONSHIPS_BLOCK
        );
    }

    Ok(())
}
