//! Amanatides & Woo voxel DDA raycast.

use glam::{IVec3, Vec3};

use crate::block::BlockFlags;
use crate::world::pos::WorldBlockPos;
use crate::world::Level;

pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block: IVec3,
    pub point: Vec3,
    pub face_normal: IVec3,
    pub distance: f32,
}

/// Returns `None` on a near-zero direction, an unsolid traversal, or an
/// overrun past `ray.max_distance`.
pub fn cast(level: &Level, ray: &Ray) -> Option<RayHit> {
    if ray.direction.length_squared() < 1e-12 {
        return None;
    }
    let dir = ray.direction.normalize();

    let mut block = IVec3::new(
        ray.origin.x.floor() as i32,
        ray.origin.y.floor() as i32,
        ray.origin.z.floor() as i32,
    );

    if is_solid(level, block) {
        return Some(RayHit {
            block,
            point: ray.origin,
            face_normal: IVec3::new(
                sign_to_normal(-dir.x),
                sign_to_normal(-dir.y),
                sign_to_normal(-dir.z),
            ),
            distance: 0.0,
        });
    }

    let step = IVec3::new(signum(dir.x), signum(dir.y), signum(dir.z));
    let t_delta = Vec3::new(inv_abs(dir.x), inv_abs(dir.y), inv_abs(dir.z));

    let mut t_max = Vec3::new(
        next_boundary(ray.origin.x, block.x, step.x, dir.x),
        next_boundary(ray.origin.y, block.y, step.y, dir.y),
        next_boundary(ray.origin.z, block.z, step.z, dir.z),
    );

    let mut dist = 0.0f32;
    let mut entry_axis = 0usize;

    loop {
        let axis = if t_max.x < t_max.y {
            if t_max.x < t_max.z {
                0
            } else {
                2
            }
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };

        dist = t_max[axis];
        if dist > ray.max_distance {
            return None;
        }

        match axis {
            0 => block.x += step.x,
            1 => block.y += step.y,
            _ => block.z += step.z,
        }
        t_max[axis] += t_delta[axis];
        entry_axis = axis;

        if is_solid(level, block) {
            break;
        }
    }

    let normal = match entry_axis {
        0 => IVec3::new(-step.x, 0, 0),
        1 => IVec3::new(0, -step.y, 0),
        _ => IVec3::new(0, 0, -step.z),
    };

    Some(RayHit { block, point: ray.origin + dir * dist, face_normal: normal, distance: dist })
}

fn is_solid(level: &Level, block: IVec3) -> bool {
    let state = level.get_block(WorldBlockPos::new(block.x, block.y, block.z));
    level
        .block_registry()
        .get(state.id())
        .map(|def| def.flags.contains(BlockFlags::SOLID))
        .unwrap_or(false)
}

fn signum(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn inv_abs(v: f32) -> f32 {
    if v == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / v).abs()
    }
}

fn next_boundary(origin: f32, block: i32, step: i32, dir: f32) -> f32 {
    if dir == 0.0 {
        return f32::INFINITY;
    }
    let boundary = block as f32 + if step > 0 { 1.0 } else { 0.0 };
    (boundary - origin) / dir
}

fn sign_to_normal(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{registry, Orientation};
    use crate::block::BlockState;
    use crate::config::{ChunkSysConfig, EngineConfig, WorldGenConfig};

    fn test_level() -> (tempfile::TempDir, Level) {
        let dir = tempfile::tempdir().unwrap();
        let level = Level::open(
            dir.path(),
            &EngineConfig::default(),
            &WorldGenConfig::default(),
            &ChunkSysConfig { background_generation: false, ..ChunkSysConfig::default() },
        );
        (dir, level)
    }

    #[test]
    fn scenario_d_ray_face() {
        let (_dir, mut level) = test_level();
        level.set_block(WorldBlockPos::new(3, 64, 0), BlockState::new(registry::STONE, Orientation::North));

        let hit = cast(
            &level,
            &Ray { origin: Vec3::new(0.5, 64.5, 0.5), direction: Vec3::new(1.0, 0.0, 0.0), max_distance: 100.0 },
        )
        .unwrap();

        assert_eq!(hit.block, IVec3::new(3, 64, 0));
        assert_eq!(hit.face_normal, IVec3::new(-1, 0, 0));
        assert!((hit.distance - 2.5).abs() < 1e-4);
    }

    #[test]
    fn zero_direction_guard_returns_none() {
        let (_dir, level) = test_level();
        let hit = cast(&level, &Ray { origin: Vec3::ZERO, direction: Vec3::ZERO, max_distance: 10.0 });
        assert!(hit.is_none());
    }

    #[test]
    fn overrun_returns_none() {
        let (_dir, level) = test_level();
        let hit = cast(
            &level,
            &Ray { origin: Vec3::new(0.5, 300.5, 0.5), direction: Vec3::new(0.0, -1.0, 0.0), max_distance: 1.0 },
        );
        assert!(hit.is_none());
    }
}
