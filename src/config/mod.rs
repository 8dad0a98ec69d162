//! Layered engine configuration, loaded from `./config/*.toml` with
//! hardcoded defaults matching the engine's documented tuning constants.

mod chunksys;
mod engine;
mod gameplay;
mod rendering;
mod worldgen;

pub use chunksys::ChunkSysConfig;
pub use engine::EngineConfig;
pub use gameplay::GameplayConfig;
pub use rendering::RenderingConfig;
pub use worldgen::WorldGenConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aggregate of every config section the engine reads at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub chunk_sys: ChunkSysConfig,
    #[serde(default)]
    pub world_gen: WorldGenConfig,
    #[serde(default)]
    pub gameplay: GameplayConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
}

impl Config {
    /// Loads `path` as TOML, falling back to defaults for any missing
    /// section. A missing file is not an error — it just means defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|err| {
                log::warn!("config file {:?} failed to parse ({err}); using defaults", path);
                Config::default()
            }),
            Err(_) => {
                log::info!("no config file at {:?}; using defaults", path);
                Config::default()
            }
        }
    }
}
