use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplayConfig {
    /// Block interaction reach, in world units.
    pub reach_distance: f32,
    /// Ticks a player may go without a `BlockHit` before mining progress
    /// resets.
    pub mining_grace_ticks: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            reach_distance: 5.0,
            mining_grace_ticks: 7,
        }
    }
}
