use super::{BlockFlags, BlockId};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `OnBroken` callback: invoked with the id of the block that broke.
pub type OnBrokenFn = fn(BlockId);

/// Static compile-time metadata for one `BlockId`.
#[derive(Debug, Clone)]
pub struct BlockDef {
    pub id: BlockId,
    pub name: &'static str,
    pub texture_set: &'static str,
    pub flags: BlockFlags,
    /// `0` = instant, `u32::MAX` = unbreakable.
    pub break_ticks: u32,
    pub has_block_entity: bool,
    pub openable: bool,
    pub on_broken: Option<OnBrokenFn>,
}

impl BlockDef {
    pub const fn is_solid(&self) -> bool {
        self.flags.contains(BlockFlags::SOLID)
    }
}

/// Holds the full set of registered block definitions, keyed by id.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    defs: HashMap<BlockId, BlockDef>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self { defs: HashMap::new() }
    }

    pub fn register(&mut self, def: BlockDef) {
        self.defs.insert(def.id, def);
    }

    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.defs.get(&id)
    }

    /// Builds the registry with the engine's built-in blocks (air, dirt,
    /// stone, bedrock, grass, furnace).
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        for def in DEFAULT_BLOCKS.iter() {
            reg.register(def.clone());
        }
        reg
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub const AIR: BlockId = BlockId(0);
pub const STONE: BlockId = BlockId(1);
pub const DIRT: BlockId = BlockId(2);
pub const GRASS: BlockId = BlockId(3);
pub const BEDROCK: BlockId = BlockId(4);
pub const FURNACE: BlockId = BlockId(5);

static DEFAULT_BLOCKS: Lazy<Vec<BlockDef>> = Lazy::new(|| {
    vec![
        BlockDef {
            id: AIR,
            name: "air",
            texture_set: "none",
            flags: BlockFlags::NONE,
            break_ticks: 0,
            has_block_entity: false,
            openable: false,
            on_broken: None,
        },
        BlockDef {
            id: STONE,
            name: "stone",
            texture_set: "stone",
            flags: BlockFlags::SOLID.union(BlockFlags::OPAQUE),
            break_ticks: 60,
            has_block_entity: false,
            openable: false,
            on_broken: None,
        },
        BlockDef {
            id: DIRT,
            name: "dirt",
            texture_set: "dirt",
            flags: BlockFlags::SOLID.union(BlockFlags::OPAQUE),
            break_ticks: 15,
            has_block_entity: false,
            openable: false,
            on_broken: None,
        },
        BlockDef {
            id: GRASS,
            name: "grass",
            texture_set: "grass",
            flags: BlockFlags::SOLID.union(BlockFlags::OPAQUE),
            break_ticks: 15,
            has_block_entity: false,
            openable: false,
            on_broken: None,
        },
        BlockDef {
            id: BEDROCK,
            name: "bedrock",
            texture_set: "bedrock",
            flags: BlockFlags::SOLID.union(BlockFlags::OPAQUE),
            break_ticks: super::BREAK_TICKS_UNBREAKABLE,
            has_block_entity: false,
            openable: false,
            on_broken: None,
        },
        BlockDef {
            id: FURNACE,
            name: "furnace",
            texture_set: "furnace",
            flags: BlockFlags::SOLID.union(BlockFlags::OPAQUE),
            break_ticks: 40,
            has_block_entity: true,
            openable: true,
            on_broken: None,
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_core_blocks() {
        let reg = BlockRegistry::with_defaults();
        assert!(reg.get(STONE).unwrap().is_solid());
        assert!(!reg.get(AIR).unwrap().is_solid());
        assert!(reg.get(FURNACE).unwrap().has_block_entity);
    }
}
