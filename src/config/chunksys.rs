use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSysConfig {
    /// View radius in chunks around the streaming center.
    pub view_radius: i32,
    /// Chunks generated/loaded per call to `UpdateStreaming`, when the
    /// background worker is enabled.
    pub max_chunks_per_update: u32,
    /// Enables the optional background chunk-generation worker pool.
    pub background_generation: bool,
}

impl Default for ChunkSysConfig {
    fn default() -> Self {
        Self {
            view_radius: 8,
            max_chunks_per_update: 4,
            background_generation: false,
        }
    }
}
