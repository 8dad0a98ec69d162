use crate::block::BlockState;
use crate::world::pos::LocalBlockPos;

pub const CHUNK_SECTION_VOLUME: usize = 4096;

/// A 16x16x16 slab of a chunk: the meshing unit.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    blocks: Box<[BlockState; CHUNK_SECTION_VOLUME]>,
    dirty: bool,
}

impl ChunkSection {
    pub fn empty() -> Self {
        Self {
            blocks: Box::new([BlockState::AIR; CHUNK_SECTION_VOLUME]),
            dirty: false,
        }
    }

    /// `local` must already be reduced to section-local y (0..16).
    pub fn get(&self, local: LocalBlockPos) -> BlockState {
        self.blocks[local.section_block_index()]
    }

    /// Returns `true` if the write changed the stored state, which is the
    /// only case that marks the section dirty.
    pub fn set(&mut self, local: LocalBlockPos, state: BlockState) -> bool {
        let idx = local.section_block_index();
        if self.blocks[idx] == state {
            return false;
        }
        self.blocks[idx] = state;
        self.dirty = true;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    pub fn raw_blocks(&self) -> &[BlockState; CHUNK_SECTION_VOLUME] {
        &self.blocks
    }

    pub fn raw_blocks_mut(&mut self) -> &mut [BlockState; CHUNK_SECTION_VOLUME] {
        &mut self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;

    #[test]
    fn set_only_dirties_on_change() {
        let mut section = ChunkSection::empty();
        let pos = LocalBlockPos::new(1, 2, 3);
        assert!(!section.is_dirty());
        assert!(section.set(pos, BlockState::new(BlockId(7), Default::default())));
        assert!(section.is_dirty());
        section.clear_dirty();
        assert!(!section.set(pos, BlockState::new(BlockId(7), Default::default())));
        assert!(!section.is_dirty());
    }
}
