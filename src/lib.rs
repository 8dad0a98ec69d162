//! Core simulation engine for a chunked voxel sandbox: world streaming,
//! ECS, fixed-tick scheduling, voxel physics, raycasting, chunk meshing,
//! and the block interaction pipeline. Rendering, windowing/input, the
//! overlay UI toolkit, and the network transport are collaborators this
//! crate defines trait/data seams for, not implementations of.

pub mod app;
pub mod block;
pub mod config;
pub mod ecs;
pub mod error;
pub mod events;
pub mod interaction;
pub mod mesher;
pub mod net;
pub mod physics;
pub mod raycast;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod time;
pub mod ui;
pub mod world;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::ecs::*;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::events::EventBus;
    pub use crate::scheduler::{Phase, Scheduler, System, SystemContext};
    pub use crate::state::{GameContext, GameState, StateStack};
    pub use crate::time::FixedTimeStep;
    pub use crate::world::Level;
}
