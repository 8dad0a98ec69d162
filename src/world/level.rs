//! World-coordinate block access, chunk streaming, terrain generation via
//! fractal noise, explosion carving, and persistence.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::block::registry::BlockRegistry;
use crate::block::BlockState;
use crate::config::{ChunkSysConfig, EngineConfig, WorldGenConfig};
use crate::world::chunk::Chunk;
use crate::world::generator::TerrainGenerator;
use crate::world::persistence::{PlayerSave, WorldMeta, WorldSave};
use crate::world::pos::{ChunkPos, WorldBlockPos};
use crate::world::worker::ChunkWorkerPool;

/// Fires `Save()` every `interval`; `tick`/`update` drains elapsed time.
struct IntervalTimer {
    interval: Duration,
    accumulated: Duration,
}

impl IntervalTimer {
    fn new(interval: Duration) -> Self {
        Self { interval, accumulated: Duration::ZERO }
    }

    /// Returns `true` (and resets) once `accumulated` crosses `interval`.
    fn advance(&mut self, dt: Duration) -> bool {
        self.accumulated += dt;
        if self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            true
        } else {
            false
        }
    }
}

pub struct Level {
    chunks: HashMap<ChunkPos, Chunk>,
    generator: Arc<TerrainGenerator>,
    registry: Arc<BlockRegistry>,
    save: WorldSave,
    meta: WorldMeta,
    autosave_timer: IntervalTimer,
    worker: Option<ChunkWorkerPool>,
    /// Positions submitted to `worker` whose result hasn't been drained yet;
    /// guards against resubmitting the same chunk every `update_streaming` call.
    pending_generation: HashSet<ChunkPos>,
    max_chunks_per_update: u32,
}

impl Level {
    pub fn open(root: impl Into<PathBuf>, engine_cfg: &EngineConfig, world_cfg: &WorldGenConfig, chunk_cfg: &ChunkSysConfig) -> Self {
        let root = root.into();
        let save = WorldSave::new(root);
        let meta = match save.load_meta() {
            Ok(meta) => meta,
            Err(_) => WorldMeta { version: 1, seed: world_cfg.seed, tick: 0 },
        };
        let generator = Arc::new(TerrainGenerator::new(meta.seed, world_cfg));
        let worker = if chunk_cfg.background_generation {
            Some(ChunkWorkerPool::new(Arc::clone(&generator), 2))
        } else {
            None
        };

        Self {
            chunks: HashMap::new(),
            generator,
            registry: Arc::new(BlockRegistry::with_defaults()),
            save,
            meta,
            autosave_timer: IntervalTimer::new(Duration::from_secs_f32(engine_cfg.autosave_interval_secs)),
            worker,
            pending_generation: HashSet::new(),
            max_chunks_per_update: chunk_cfg.max_chunks_per_update,
        }
    }

    /// Folds every background-generated chunk that has finished since the
    /// last call into `self.chunks`. A no-op when the worker is disabled.
    fn drain_worker(&mut self) {
        let Some(worker) = &self.worker else { return };
        for column in worker.drain() {
            self.pending_generation.remove(&column.pos);
            if self.chunks.contains_key(&column.pos) {
                continue;
            }
            let mut chunk = Chunk::new_empty(column.pos);
            for (local, state) in column.blocks {
                chunk.set_block(local, state);
            }
            chunk.mark_mesh_dirty();
            self.chunks.insert(column.pos, chunk);
            for neighbor in column.pos.neighbors4() {
                if let Some(n) = self.chunks.get_mut(&neighbor) {
                    n.mark_mesh_dirty();
                }
            }
        }
    }

    pub fn meta(&self) -> WorldMeta {
        self.meta
    }

    pub fn block_registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Positions of every loaded chunk with `ChunkDirty::MESH` set.
    pub fn chunks_needing_mesh_rebuild(&self) -> Vec<ChunkPos> {
        self.chunks
            .iter()
            .filter(|(_, chunk)| chunk.dirty().contains(crate::world::chunk::ChunkDirty::MESH))
            .map(|(pos, _)| *pos)
            .collect()
    }

    pub fn is_chunk_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Returns `Air` if the owning chunk is absent.
    pub fn get_block(&self, pos: WorldBlockPos) -> BlockState {
        let (chunk_pos, local) = pos.split();
        match self.chunks.get(&chunk_pos) {
            Some(chunk) => chunk.get_block(local),
            None => BlockState::AIR,
        }
    }

    /// Ensures the target chunk exists, writes, and marks the correct set
    /// of chunks `Mesh`-dirty.
    pub fn set_block(&mut self, pos: WorldBlockPos, state: BlockState) -> bool {
        let (chunk_pos, local) = pos.split();
        self.ensure_chunk(chunk_pos);

        let changed = {
            let chunk = self.chunks.get_mut(&chunk_pos).expect("just ensured");
            chunk.set_block(local, state)
        };

        if changed {
            if let Some(chunk) = self.chunks.get_mut(&chunk_pos) {
                chunk.mark_mesh_dirty();
                chunk.mark_save_dirty();
            }
            if local.on_xz_boundary() {
                for neighbor in chunk_pos.neighbors4() {
                    if let Some(n) = self.chunks.get_mut(&neighbor) {
                        n.mark_mesh_dirty();
                    }
                }
            }
        }

        changed
    }

    /// Sets every voxel inside `radius` of `center` (by cell-center
    /// distance) to `Air`, then mesh-dirties every touched chunk and its
    /// neighbors.
    pub fn explode(&mut self, center: glam::Vec3, radius: f32) {
        let r = radius.ceil() as i32;
        let r2 = radius * radius;
        let cx = center.x.floor() as i32;
        let cy = center.y.floor() as i32;
        let cz = center.z.floor() as i32;

        let mut touched = std::collections::HashSet::new();

        for x in (cx - r)..=(cx + r) {
            for y in (cy - r)..=(cy + r) {
                for z in (cz - r)..=(cz + r) {
                    let cell_center = glam::Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5);
                    if cell_center.distance_squared(center) > r2 {
                        continue;
                    }
                    let pos = WorldBlockPos::new(x, y, z);
                    let (chunk_pos, local) = pos.split();
                    self.ensure_chunk(chunk_pos);
                    let changed = self
                        .chunks
                        .get_mut(&chunk_pos)
                        .expect("just ensured")
                        .set_block(local, BlockState::AIR);
                    if changed {
                        touched.insert(chunk_pos);
                    }
                }
            }
        }

        for chunk_pos in &touched {
            if let Some(chunk) = self.chunks.get_mut(chunk_pos) {
                chunk.mark_mesh_dirty();
                chunk.mark_save_dirty();
            }
            for neighbor in chunk_pos.neighbors4() {
                if let Some(n) = self.chunks.get_mut(&neighbor) {
                    n.mark_mesh_dirty();
                }
            }
        }
    }

    /// Ensures `pos` exists: fold in a background result if one is ready,
    /// else load from disk, else generate synchronously. The newly ensured
    /// chunk and its four cardinal neighbors are mesh-dirtied. Idempotent:
    /// calling twice returns the same chunk.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) {
        self.drain_worker();
        if self.chunks.contains_key(&pos) {
            return;
        }

        let mut chunk = match self.save.load_chunk(pos) {
            Ok(chunk) => {
                debug!("loaded chunk {:?} from disk", pos);
                chunk
            }
            Err(_) => {
                debug!("generating chunk {:?}", pos);
                let mut chunk = Chunk::new_empty(pos);
                for (local, state) in self.generator.generate_chunk_blocks(pos) {
                    chunk.set_block(local, state);
                }
                chunk
            }
        };
        chunk.mark_mesh_dirty();
        self.chunks.insert(pos, chunk);
        self.pending_generation.remove(&pos);

        for neighbor in pos.neighbors4() {
            if let Some(n) = self.chunks.get_mut(&neighbor) {
                n.mark_mesh_dirty();
            }
        }
    }

    /// Ensures every chunk within the square view radius around
    /// `player_pos` and unloads (saving dirty ones) chunks outside it.
    ///
    /// When the background worker is enabled, at most
    /// `max_chunks_per_update` *new* chunks are generated synchronously
    /// per call; the rest of the view square is handed to the worker and
    /// picked up by a later call once `drain_worker` finds it ready.
    /// Chunks already loaded don't count against the budget.
    pub fn update_streaming(&mut self, player_chunk: ChunkPos, view_radius: i32) {
        self.drain_worker();

        let mut budget = self.worker.is_some().then_some(self.max_chunks_per_update);

        for dx in -view_radius..=view_radius {
            for dz in -view_radius..=view_radius {
                let pos = ChunkPos::new(player_chunk.x + dx, player_chunk.z + dz);
                if self.chunks.contains_key(&pos) {
                    continue;
                }

                match &mut budget {
                    Some(0) => {
                        if let Some(worker) = &self.worker {
                            if self.pending_generation.insert(pos) {
                                worker.submit(pos);
                            }
                        }
                    }
                    Some(remaining) => {
                        *remaining -= 1;
                        self.ensure_chunk(pos);
                    }
                    None => self.ensure_chunk(pos),
                }
            }
        }

        let to_unload: Vec<ChunkPos> = self
            .chunks
            .keys()
            .copied()
            .filter(|pos| pos.chebyshev_distance(player_chunk) > view_radius)
            .collect();

        for pos in to_unload {
            if let Some(chunk) = self.chunks.get(&pos) {
                if chunk.dirty().contains(crate::world::chunk::ChunkDirty::SAVE) {
                    if let Err(err) = self.save.save_chunk(chunk) {
                        warn!("failed to save chunk {:?} on unload: {err}", pos);
                    }
                }
            }
            self.chunks.remove(&pos);
        }
    }

    /// Drives the autosave timer and, on firing, saves every loaded chunk
    /// that is `Save`-dirty.
    pub fn update(&mut self, dt: Duration) {
        if self.autosave_timer.advance(dt) {
            self.save();
        }
    }

    /// Flushes every loaded chunk with the `Save` dirty bit set.
    pub fn save(&mut self) {
        let mut saved = 0;
        for chunk in self.chunks.values_mut() {
            if chunk.dirty().contains(crate::world::chunk::ChunkDirty::SAVE) {
                match self.save.save_chunk(chunk) {
                    Ok(()) => {
                        chunk.clear_save_dirty();
                        saved += 1;
                    }
                    Err(err) => warn!("failed to save chunk {:?}: {err}", chunk.pos()),
                }
            }
        }
        if let Err(err) = self.save.save_meta(&self.meta) {
            warn!("failed to save world meta: {err}");
        }
        if saved > 0 {
            info!("autosave flushed {saved} chunk(s)");
        }
    }

    pub fn save_meta_now(&self) {
        if let Err(err) = self.save.save_meta(&self.meta) {
            warn!("failed to save world meta: {err}");
        }
    }

    pub fn save_player(&self, player: &PlayerSave) {
        if let Err(err) = self.save.save_player(player) {
            warn!("failed to save player: {err}");
        }
    }

    pub fn load_player(&self) -> Option<PlayerSave> {
        self.save.load_player().ok()
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.meta.tick = tick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{registry, Orientation};

    fn test_level(dir: &std::path::Path) -> Level {
        Level::open(
            dir,
            &EngineConfig::default(),
            &WorldGenConfig::default(),
            &ChunkSysConfig { background_generation: false, ..ChunkSysConfig::default() },
        )
    }

    #[test]
    fn block_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut level = test_level(dir.path());
        let pos = WorldBlockPos::new(0, 64, 0);
        let state = BlockState::new(registry::STONE, Orientation::North);
        level.set_block(pos, state);
        assert_eq!(level.get_block(pos), state);
    }

    #[test]
    fn scenario_a_terrain_write_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut level = test_level(dir.path());
            assert!(level.get_block(WorldBlockPos::new(0, 200, 0)).is_air());
            level.set_block(
                WorldBlockPos::new(0, 64, 0),
                BlockState::new(registry::STONE, Orientation::North),
            );
            assert_eq!(level.get_block(WorldBlockPos::new(0, 64, 0)).id(), registry::STONE);
            level.save();
            level.save_meta_now();
        }
        let mut reopened = test_level(dir.path());
        reopened.ensure_chunk(ChunkPos::new(0, 0));
        assert_eq!(reopened.get_block(WorldBlockPos::new(0, 64, 0)).id(), registry::STONE);
    }

    #[test]
    fn scenario_e_chunk_boundary_dirties_both_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let mut level = test_level(dir.path());
        level.set_block(
            WorldBlockPos::new(15, 64, 0),
            BlockState::new(registry::STONE, Orientation::North),
        );
        assert!(level
            .chunk(ChunkPos::new(0, 0))
            .unwrap()
            .dirty()
            .contains(crate::world::chunk::ChunkDirty::MESH));
        assert!(level
            .chunk(ChunkPos::new(1, 0))
            .unwrap()
            .dirty()
            .contains(crate::world::chunk::ChunkDirty::MESH));
    }

    #[test]
    fn ensure_chunk_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut level = test_level(dir.path());
        level.ensure_chunk(ChunkPos::new(3, 3));
        let before = level.chunk(ChunkPos::new(3, 3)).unwrap().mesh_revision();
        level.ensure_chunk(ChunkPos::new(3, 3));
        let after = level.chunk(ChunkPos::new(3, 3)).unwrap().mesh_revision();
        assert_eq!(before, after);
    }
}
