//! Per-world resource backing the block interaction pipeline:
//! four event queues, per-player mining state, and the block-entity map.

use std::collections::HashMap;

use glam::IVec3;

use crate::ecs::Entity;
use crate::world::pos::WorldBlockPos;

#[derive(Debug, Clone, Copy)]
pub struct BlockHit {
    pub player: Entity,
    pub pos: WorldBlockPos,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockBreak {
    pub player: Entity,
    pub pos: WorldBlockPos,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockUse {
    pub player: Entity,
    pub pos: WorldBlockPos,
}

#[derive(Debug, Clone, Copy)]
pub struct OpenBlockEntity {
    pub player: Entity,
    pub block_entity: Entity,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerMiningState {
    pub has_target: bool,
    pub target: IVec3,
    pub accumulated_ticks: u32,
    pub last_hit_tick: u64,
}

#[derive(Default)]
pub struct BlockInteractionResource {
    pub hit_queue: Vec<BlockHit>,
    pub break_queue: Vec<BlockBreak>,
    pub use_queue: Vec<BlockUse>,
    pub open_queue: Vec<OpenBlockEntity>,
    pub mining_state: HashMap<Entity, PlayerMiningState>,
    pub block_entities: HashMap<WorldBlockPos, Entity>,
}

impl BlockInteractionResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mining_state_mut(&mut self, player: Entity) -> &mut PlayerMiningState {
        self.mining_state.entry(player).or_default()
    }
}
