//! Optional background chunk-generation worker pool.
//!
//! Disabled by default (`ChunkSysConfig::background_generation`). When
//! enabled, `Level::update_streaming` offloads chunks beyond its
//! per-call synchronous budget (`max_chunks_per_update`) to a `rayon`
//! thread pool instead of generating them inline; `Level::ensure_chunk`
//! and `Level::update_streaming` both drain completed results at the
//! top of the call and fold them into the chunk map before falling back
//! to synchronous load-or-generate. Chunk data mutation itself stays
//! exclusively on the main thread.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::block::BlockState;
use crate::world::pos::{ChunkPos, LocalBlockPos};
use crate::world::generator::TerrainGenerator;

/// Immutable payload produced by a background generation job: just the
/// blocks, no dirty/mesh-revision state (that's assigned when the main
/// thread folds it into a freshly-created `Chunk`).
pub struct ChunkColumn {
    pub pos: ChunkPos,
    pub blocks: Vec<(LocalBlockPos, BlockState)>,
}

pub struct ChunkWorkerPool {
    pool: rayon::ThreadPool,
    tx: Sender<ChunkColumn>,
    rx: Receiver<ChunkColumn>,
    generator: Arc<TerrainGenerator>,
}

impl ChunkWorkerPool {
    pub fn new(generator: Arc<TerrainGenerator>, threads: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .build()
            .expect("failed to build chunk worker thread pool");
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { pool, tx, rx, generator }
    }

    /// Enqueues generation of `pos`; the result arrives later via `drain`.
    pub fn submit(&self, pos: ChunkPos) {
        let generator = Arc::clone(&self.generator);
        let tx = self.tx.clone();
        self.pool.spawn(move || {
            let blocks = generator.generate_chunk_blocks(pos);
            // The receiver may have been dropped if the level shut down;
            // that's not an error for the worker.
            let _ = tx.send(ChunkColumn { pos, blocks });
        });
    }

    /// Drains every job that has completed so far without blocking.
    pub fn drain(&self) -> Vec<ChunkColumn> {
        self.rx.try_iter().collect()
    }
}
