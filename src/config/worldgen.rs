use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenConfig {
    pub seed: u32,
    pub octaves: usize,
    pub base_frequency: f64,
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 5,
            base_frequency: 0.005,
            min_height: 32,
            max_height: 128,
        }
    }
}
