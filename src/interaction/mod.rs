//! Block interaction pipeline: intent raycasting, tick-based mining
//! progress, break/use/open events, and the furnace block entity.

pub mod recipes;
pub mod resource;
pub mod systems;

pub use resource::{BlockBreak, BlockHit, BlockInteractionResource, BlockUse, OpenBlockEntity, PlayerMiningState};
pub use systems::{
    BlockBreakSystem, BlockEntityInteractSystem, BlockHitSystem, BlockIntentSystem, BlockUseSystem, FurnaceSystem,
};
