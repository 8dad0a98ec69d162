use bitflags::bitflags;

use crate::block::BlockState;
use crate::world::pos::{ChunkPos, LocalBlockPos, SECTIONS_PER_CHUNK};
use crate::world::section::ChunkSection;

bitflags! {
    /// Per-chunk dirty bitmask: whether the mesh needs rebuilding, the
    /// save file needs rewriting, or both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChunkDirty: u8 {
        const NONE = 0;
        const MESH = 1 << 0;
        const SAVE = 1 << 1;
    }
}

/// A 16x256x16 region of voxels: the persistence unit.
///
/// Holds no back-reference to its owning `Level` — Rust ownership makes a
/// `Chunk -> Level -> Chunk` cycle awkward, and no operation here actually
/// needs a chunk to reach its level; callers that need cross-chunk context
/// (the mesher, `Level::SetBlock`) already hold the `Level` and look
/// neighbors up through it.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    sections: [ChunkSection; SECTIONS_PER_CHUNK as usize],
    dirty: ChunkDirty,
    mesh_revision: u64,
}

impl Chunk {
    pub fn new_empty(pos: ChunkPos) -> Self {
        Self {
            pos,
            sections: std::array::from_fn(|_| ChunkSection::empty()),
            dirty: ChunkDirty::MESH | ChunkDirty::SAVE,
            mesh_revision: 0,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn dirty(&self) -> ChunkDirty {
        self.dirty
    }

    pub fn mark_mesh_dirty(&mut self) {
        self.dirty.insert(ChunkDirty::MESH);
    }

    pub fn mark_save_dirty(&mut self) {
        self.dirty.insert(ChunkDirty::SAVE);
    }

    /// Clears `MESH` — callers must only do this after *every* section has
    /// been rebuilt.
    pub fn clear_mesh_dirty(&mut self) {
        self.dirty.remove(ChunkDirty::MESH);
    }

    pub fn clear_save_dirty(&mut self) {
        self.dirty.remove(ChunkDirty::SAVE);
    }

    pub fn section(&self, index: i32) -> Option<&ChunkSection> {
        self.sections.get(index as usize)
    }

    pub fn section_mut(&mut self, index: i32) -> Option<&mut ChunkSection> {
        self.sections.get_mut(index as usize)
    }

    pub fn sections(&self) -> &[ChunkSection; SECTIONS_PER_CHUNK as usize] {
        &self.sections
    }

    /// Returns `Air` for an out-of-range local position; never panics.
    pub fn get_block(&self, local: LocalBlockPos) -> BlockState {
        if !local.in_chunk_bounds() {
            return BlockState::AIR;
        }
        let section_idx = local.section_index();
        match self.sections.get(section_idx as usize) {
            Some(section) => section.get(local),
            None => BlockState::AIR,
        }
    }

    /// Writes `state` at `local`. Returns `true` if the value changed, in
    /// which case `mesh_revision` strictly increases.
    /// Out-of-range writes are silently ignored.
    pub fn set_block(&mut self, local: LocalBlockPos, state: BlockState) -> bool {
        if !local.in_chunk_bounds() {
            return false;
        }
        let section_idx = local.section_index();
        let Some(section) = self.sections.get_mut(section_idx as usize) else {
            return false;
        };
        if section.set(local, state) {
            self.mesh_revision += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;

    #[test]
    fn out_of_range_get_returns_air() {
        let chunk = Chunk::new_empty(ChunkPos::new(0, 0));
        assert!(chunk.get_block(LocalBlockPos::new(-1, 0, 0)).is_air());
        assert!(chunk.get_block(LocalBlockPos::new(0, 9999, 0)).is_air());
    }

    #[test]
    fn mesh_revision_strictly_increases_on_change() {
        let mut chunk = Chunk::new_empty(ChunkPos::new(0, 0));
        let pos = LocalBlockPos::new(1, 1, 1);
        let rev0 = chunk.mesh_revision();
        assert!(chunk.set_block(pos, BlockState::new(BlockId(9), Default::default())));
        assert!(chunk.mesh_revision() > rev0);
        let rev1 = chunk.mesh_revision();
        assert!(!chunk.set_block(pos, BlockState::new(BlockId(9), Default::default())));
        assert_eq!(chunk.mesh_revision(), rev1);
    }
}
