//! Plain-data components attached to entities. All of them
//! are simple aggregates; behavior lives in the systems that iterate a
//! `View` over them.

use glam::{Mat4, Vec2, Vec3};

use super::entity::Entity;
use crate::block::BlockId;
use crate::world::pos::WorldBlockPos;

/// `prev_*` fields are captured at the start of each fixed tick so render
/// code can interpolate between the previous and current tick state.
#[derive(Debug, Clone, Copy)]
pub struct CTransform {
    pub position: Vec3,
    pub prev_position: Vec3,
    pub rotation: Vec3,
    pub prev_rotation: Vec3,
    pub scale: Vec3,
}

impl Default for CTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            prev_position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            prev_rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl CTransform {
    /// Called once at the start of each fixed tick, before physics moves
    /// the entity, so interpolation has a stable previous sample.
    pub fn snapshot_previous(&mut self) {
        self.prev_position = self.position;
        self.prev_rotation = self.rotation;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CVelocity {
    pub velocity: Vec3,
}

/// Local-space AABB offsets from the entity's `CTransform::position`.
#[derive(Debug, Clone, Copy)]
pub struct CPhysics {
    pub bb_min: Vec3,
    pub bb_max: Vec3,
    pub on_ground: bool,
    pub bounciness: f32,
}

impl CPhysics {
    pub fn new(bb_min: Vec3, bb_max: Vec3) -> Self {
        Self { bb_min, bb_max, on_ground: false, bounciness: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CInput {
    pub movement: Vec2,
    pub jump_request: bool,
    pub sprint_request: bool,
    pub was_jump_down: bool,
    pub jump_cooldown: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CLookInput {
    pub yaw_delta: f32,
    pub pitch_delta: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct CCamera {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl Default for CCamera {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            fov: 70.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.05,
            far: 1000.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CCameraRig {
    pub target_entity: Entity,
    pub offset: Vec3,
    pub follow_yaw: f32,
    pub follow_pitch: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct CLocalPlayerTag {
    pub camera_entity: Entity,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CPlayerTag;

/// Opaque handle into the renderer's mesh table; the ECS never interprets
/// the contents.
#[derive(Debug, Clone, Copy)]
pub struct CMesh {
    pub mesh_ref: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct CItemDrop {
    pub block_id: BlockId,
    pub ticks_remaining: u32,
    pub max_ticks: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct CHealth {
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct CProjectile {
    pub damage: f32,
    pub owner: Entity,
    pub destroy_on_hit: bool,
}

/// `left_down`/`right_down` are written each tick by the input collaborator
/// before the `Intent` phase runs; `was_*` are the engine's own edge-tracking
/// memory of the previous tick's state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CBlockInteractor {
    pub reach: f32,
    pub left_down: bool,
    pub right_down: bool,
    pub was_left_down: bool,
    pub was_right_down: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CBlockEntity {
    pub pos: WorldBlockPos,
    pub block_id: BlockId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CFurnace {
    pub burn_ticks_remaining: u32,
    pub cook_ticks: u32,
    pub last_input: Option<BlockId>,
}

#[derive(Debug, Clone, Copy)]
pub struct ItemStack {
    pub item: BlockId,
    pub count: u8,
}

impl ItemStack {
    pub const EMPTY: ItemStack = ItemStack { item: BlockId::AIR, count: 0 };

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item == BlockId::AIR
    }
}

#[derive(Debug, Clone)]
pub struct CInventory {
    pub slots: Vec<ItemStack>,
}

impl CInventory {
    pub fn new(slot_count: usize) -> Self {
        Self { slots: vec![ItemStack::EMPTY; slot_count] }
    }
}

/// Self-destructing counter; a system that owns `CTick` entities is
/// responsible for destroying the entity once `current_tick == max_ticks`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CTick {
    pub current_tick: u32,
    pub max_ticks: u32,
}
