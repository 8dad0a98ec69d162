//! Per-axis swept AABB resolution against the voxel grid, generalizing
//! the old single-hardcoded-player-box collision resolver into one that
//! runs for any `{CTransform, CVelocity, CPhysics}` entity.

use glam::Vec3;

use crate::block::BlockFlags;
use crate::ecs::{CPhysics, CTransform, CVelocity, Registry};
use crate::world::Level;

use super::aabb::Aabb;

pub const GRAVITY: f32 = -32.0;
pub const TERMINAL_VELOCITY: f32 = -48.0;
pub const JUMP_VELOCITY: f32 = 9.0;
pub const GROUND_MAXSPEED: f32 = 4.3;
pub const SPRINT_MODIFIER: f32 = 1.3;
pub const PLAYER_BB_MIN: Vec3 = Vec3::new(-0.3, 0.0, -0.3);
pub const PLAYER_BB_MAX: Vec3 = Vec3::new(0.3, 1.8, 0.3);

const GROUND_PROBE: f32 = 0.05;
const SKIN: f32 = 0.001;
const EPSILON: f32 = 1e-4;
const VELOCITY_SNAP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Runs one fixed-tick of voxel physics over every entity that has
/// `{CTransform, CVelocity, CPhysics}`, non-player entities additionally
/// getting ground friction.
pub fn step_physics(registry: &mut Registry, level: &Level, dt: f32, is_player: impl Fn(crate::ecs::Entity) -> bool) {
    for entity in crate::ecs::e_view3::<CPhysics, CTransform, CVelocity>(registry) {
        let mut transform = *registry.get::<CTransform>(entity);
        let mut velocity = *registry.get::<CVelocity>(entity);
        let mut phys = *registry.get::<CPhysics>(entity);

        phys.on_ground = probe_grounded(level, transform.position, phys.bb_min, phys.bb_max);

        if !phys.on_ground {
            velocity.velocity.y = (velocity.velocity.y + GRAVITY * dt).max(TERMINAL_VELOCITY);
        }

        if phys.on_ground && !is_player(entity) {
            let decay = 0.5f32.powf(dt * 10.0);
            velocity.velocity.x *= decay;
            velocity.velocity.z *= decay;
        }

        let step = velocity.velocity * dt;
        move_and_collide_axis(level, &mut transform.position, &mut velocity.velocity, &mut phys, step.y, Axis::Y);
        move_and_collide_axis(level, &mut transform.position, &mut velocity.velocity, &mut phys, step.x, Axis::X);
        move_and_collide_axis(level, &mut transform.position, &mut velocity.velocity, &mut phys, step.z, Axis::Z);

        *registry.get_mut::<CTransform>(entity) = transform;
        *registry.get_mut::<CVelocity>(entity) = velocity;
        *registry.get_mut::<CPhysics>(entity) = phys;
    }
}

fn probe_grounded(level: &Level, position: Vec3, bb_min: Vec3, bb_max: Vec3) -> bool {
    let probed = Aabb::from_local(position, bb_min, bb_max).translated(Vec3::new(0.0, -GROUND_PROBE, 0.0));
    any_solid_in_range(level, &probed)
}

fn any_solid_in_range(level: &Level, bounds: &Aabb) -> bool {
    voxel_range(bounds).into_iter().any(|(x, y, z)| is_solid(level, x, y, z))
}

fn is_solid(level: &Level, x: i32, y: i32, z: i32) -> bool {
    let state = level.get_block(crate::world::pos::WorldBlockPos::new(x, y, z));
    level
        .block_registry()
        .get(state.id())
        .map(|def| def.flags.contains(BlockFlags::SOLID))
        .unwrap_or(false)
}

fn voxel_range(bounds: &Aabb) -> Vec<(i32, i32, i32)> {
    let min_x = (bounds.min.x + EPSILON).floor() as i32;
    let max_x = (bounds.max.x - EPSILON).floor() as i32;
    let min_y = (bounds.min.y + EPSILON).floor() as i32;
    let max_y = (bounds.max.y - EPSILON).floor() as i32;
    let min_z = (bounds.min.z + EPSILON).floor() as i32;
    let max_z = (bounds.max.z - EPSILON).floor() as i32;

    let mut out = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            for z in min_z..=max_z {
                out.push((x, y, z));
            }
        }
    }
    out
}

/// Moves `pos[axis]` by `d`, resolving against the first solid voxel
/// encountered, clamping position, applying restitution, and (for Y-down
/// hits with low bounciness) setting `on_ground`.
fn move_and_collide_axis(level: &Level, pos: &mut Vec3, vel: &mut Vec3, phys: &mut CPhysics, d: f32, axis: Axis) {
    set_axis(pos, axis, get_axis(pos, axis) + d);

    let bounds = Aabb::from_local(*pos, phys.bb_min, phys.bb_max);
    let candidates = voxel_range(&bounds);

    let hit = candidates
        .into_iter()
        .filter(|&(x, y, z)| is_solid(level, x, y, z))
        .map(|(x, y, z)| match axis {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        })
        .reduce(|a, b| if d > 0.0 { a.min(b) } else { a.max(b) });

    let Some(hit) = hit else { return };

    let bb_min_axis = get_axis(&phys.bb_min, axis);
    let bb_max_axis = get_axis(&phys.bb_max, axis);

    if d > 0.0 {
        set_axis(pos, axis, hit as f32 - bb_max_axis - SKIN);
    } else {
        set_axis(pos, axis, (hit + 1) as f32 - bb_min_axis + SKIN);
    }

    let bounciness = phys.bounciness.clamp(0.0, 1.0);
    let new_v = -get_axis(vel, axis) * bounciness;
    set_axis(vel, axis, if new_v.abs() < VELOCITY_SNAP { 0.0 } else { new_v });

    if axis == Axis::Y && d < 0.0 && phys.bounciness < 0.5 {
        phys.on_ground = true;
    }
}

fn get_axis(v: &Vec3, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

fn set_axis(v: &mut Vec3, axis: Axis, value: f32) {
    match axis {
        Axis::X => v.x = value,
        Axis::Y => v.y = value,
        Axis::Z => v.z = value,
    }
}
