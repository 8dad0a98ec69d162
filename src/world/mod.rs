//! Chunked voxel world: positions, sections, chunks, streaming level, and
//! on-disk persistence.

pub mod chunk;
pub mod generator;
pub mod level;
pub mod persistence;
pub mod pos;
pub mod section;
pub mod worker;

pub use chunk::{Chunk, ChunkDirty};
pub use generator::TerrainGenerator;
pub use level::Level;
pub use persistence::{PlayerSave, WorldMeta, WorldSave};
pub use pos::{ChunkPos, LocalBlockPos, WorldBlockPos};
pub use section::ChunkSection;
