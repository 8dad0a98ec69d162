//! Binary serialization of world meta, player, and chunks into a
//! directory tree.
//!
//! Chunk byte order on disk is `for y { for z { for x } }` (`yzx`
//! traversal), matching the byte order this format was carried over from
//! when flattening a chunk to a buffer, even though the in-memory index
//! formula is `x + z*16 + y*16*16`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::block::BlockState;
use crate::error::{EngineError, EngineResult};
use crate::world::chunk::Chunk;
use crate::world::pos::{ChunkPos, LocalBlockPos, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

pub const CHUNK_VOLUME: usize = (CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z) as usize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldMeta {
    pub version: u32,
    pub seed: u32,
    pub tick: u64,
}

impl WorldMeta {
    pub const BYTE_LEN: usize = 4 + 4 + 8;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerSave {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PlayerSave {
    pub const BYTE_LEN: usize = 4 + 4 + 4;
}

/// Owns the on-disk directory tree for one world.
pub struct WorldSave {
    root: PathBuf,
}

impl WorldSave {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join("meta.bin")
    }

    fn player_path(&self) -> PathBuf {
        self.root.join("player.dat")
    }

    fn chunk_path(&self, pos: ChunkPos) -> PathBuf {
        self.root.join("chunks").join(format!("chunk_{}_0_{}.bin", pos.x, pos.z))
    }

    pub fn save_meta(&self, meta: &WorldMeta) -> EngineResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        let bytes = bincode::serialize(meta).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        fs::write(self.meta_path(), bytes).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))
    }

    pub fn load_meta(&self) -> EngineResult<WorldMeta> {
        let bytes = fs::read(self.meta_path()).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        if bytes.len() != WorldMeta::BYTE_LEN {
            return Err(EngineError::ChunkCorrupt { found: bytes.len(), expected: WorldMeta::BYTE_LEN });
        }
        bincode::deserialize(&bytes).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))
    }

    pub fn save_player(&self, player: &PlayerSave) -> EngineResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        let bytes = bincode::serialize(player).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        fs::write(self.player_path(), bytes).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))
    }

    pub fn load_player(&self) -> EngineResult<PlayerSave> {
        let bytes = fs::read(self.player_path()).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        if bytes.len() != PlayerSave::BYTE_LEN {
            return Err(EngineError::ChunkCorrupt { found: bytes.len(), expected: PlayerSave::BYTE_LEN });
        }
        bincode::deserialize(&bytes).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))
    }

    /// Flattens `chunk` in `yzx` order and writes it, truncate + write,
    /// no journaling.
    pub fn save_chunk(&self, chunk: &Chunk) -> EngineResult<()> {
        let dir = self.root.join("chunks");
        fs::create_dir_all(&dir).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;

        let mut buf = Vec::with_capacity(CHUNK_VOLUME * 4);
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let state = chunk.get_block(LocalBlockPos::new(x, y, z));
                    buf.extend_from_slice(&state.0.to_le_bytes());
                }
            }
        }

        fs::write(self.chunk_path(chunk.pos()), &buf)
            .map_err(|e| EngineError::ChunkIoFailed(e.to_string()))
    }

    /// Loads a chunk from disk. A size mismatch yields `ChunkCorrupt`,
    /// which the caller (`Level::EnsureChunk`) treats as "regenerate".
    pub fn load_chunk(&self, pos: ChunkPos) -> EngineResult<Chunk> {
        let bytes = fs::read(self.chunk_path(pos)).map_err(|e| EngineError::ChunkIoFailed(e.to_string()))?;
        let expected = CHUNK_VOLUME * 4;
        if bytes.len() != expected {
            return Err(EngineError::ChunkCorrupt { found: bytes.len(), expected });
        }

        let mut chunk = Chunk::new_empty(pos);
        let mut cursor = 0usize;
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let raw = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
                    cursor += 4;
                    let state = BlockState(raw);
                    if !state.is_air() {
                        chunk.set_block(LocalBlockPos::new(x, y, z), state);
                    }
                }
            }
        }
        // Loading is not itself a mutation the mesher needs to react to
        // beyond the initial full-dirty state `new_empty` already set.
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{registry, Orientation};

    #[test]
    fn chunk_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let save = WorldSave::new(dir.path());

        let mut chunk = Chunk::new_empty(ChunkPos::new(2, -3));
        chunk.set_block(
            LocalBlockPos::new(4, 64, 9),
            BlockState::new(registry::STONE, Orientation::North),
        );
        save.save_chunk(&chunk).unwrap();

        let loaded = save.load_chunk(ChunkPos::new(2, -3)).unwrap();
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    let pos = LocalBlockPos::new(x, y, z);
                    assert_eq!(chunk.get_block(pos), loaded.get_block(pos));
                }
            }
        }
    }

    #[test]
    fn meta_and_player_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let save = WorldSave::new(dir.path());

        let meta = WorldMeta { version: 1, seed: 42, tick: 9001 };
        save.save_meta(&meta).unwrap();
        let loaded = save.load_meta().unwrap();
        assert_eq!(loaded.version, meta.version);
        assert_eq!(loaded.seed, meta.seed);
        assert_eq!(loaded.tick, meta.tick);

        let player = PlayerSave { x: 1.0, y: 64.0, z: -2.5 };
        save.save_player(&player).unwrap();
        let loaded_player = save.load_player().unwrap();
        assert_eq!(loaded_player.x, player.x);
        assert_eq!(loaded_player.z, player.z);
    }

    #[test]
    fn corrupt_chunk_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let save = WorldSave::new(dir.path());
        fs::create_dir_all(dir.path().join("chunks")).unwrap();
        fs::write(dir.path().join("chunks").join("chunk_0_0_0.bin"), b"short").unwrap();
        assert!(matches!(
            save.load_chunk(ChunkPos::new(0, 0)),
            Err(EngineError::ChunkCorrupt { .. })
        ));
    }
}
