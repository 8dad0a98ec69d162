use serde::{Deserialize, Serialize};

/// Top-level engine timing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulation ticks per second.
    pub tick_rate: f32,
    /// Max frame delta passed to `FixedTimeStep::advance`.
    pub max_frame_dt: f32,
    /// Autosave interval in seconds.
    pub autosave_interval_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            max_frame_dt: 0.25,
            autosave_interval_secs: 10.0,
        }
    }
}
