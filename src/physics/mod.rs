//! Voxel-grid collision resolution and broadphase overlap detection.

pub mod aabb;
pub mod overlap;
pub mod voxel;

pub use aabb::Aabb;
pub use overlap::{OverlapEvent, OverlapTracker, PairKey};
pub use voxel::{
    step_physics, GRAVITY, GROUND_MAXSPEED, JUMP_VELOCITY, PLAYER_BB_MAX, PLAYER_BB_MIN, SPRINT_MODIFIER,
    TERMINAL_VELOCITY,
};
