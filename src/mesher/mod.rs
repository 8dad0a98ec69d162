//! Per-section face-culling chunk mesher with neighbor queries across
//! chunk seams and revision-gated rebuilds.

pub mod atlas;
pub mod faces;
pub mod vertex;

pub use atlas::{rotate_face, AtlasRegion, NullAtlas, TextureAtlas};
pub use faces::Face;
pub use vertex::{ChunkMesh, Vertex};

use glam::Vec3;

use crate::block::registry::BlockRegistry;
use crate::block::BlockFlags;
use crate::world::pos::{LocalBlockPos, SECTION_SIZE};
use crate::world::{Chunk, Level};

/// Builds the mesh for one 16x16x16 section of `chunk`. Neighbor voxels
/// outside the section fall back to `level.get_block`, which returns `Air`
/// for not-yet-loaded chunks; those seam faces get rebuilt once the
/// neighbor actually loads and dirties this chunk.
pub fn mesh_section(
    chunk: &Chunk,
    section_index: i32,
    level: &Level,
    registry: &BlockRegistry,
    atlas: &dyn TextureAtlas,
) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();
    let chunk_origin = chunk.pos().to_world_origin();
    let y_base = section_index * SECTION_SIZE;

    for x in 0..SECTION_SIZE {
        for y in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                let local = LocalBlockPos::new(x, y_base + y, z);
                let state = chunk.get_block(local);
                if state.is_air() {
                    continue;
                }

                for face in Face::ALL {
                    let delta = face.delta();
                    let neighbor_local = LocalBlockPos::new(local.x + delta.x, local.y + delta.y, local.z + delta.z);

                    let neighbor_state = if neighbor_local.in_chunk_bounds() {
                        chunk.get_block(neighbor_local)
                    } else {
                        let world_pos = chunk_origin.offset(neighbor_local.x, neighbor_local.y, neighbor_local.z);
                        level.get_block(world_pos)
                    };

                    if is_opaque(registry, neighbor_state.id()) {
                        continue;
                    }

                    emit_quad(&mut mesh, local, state, face, atlas);
                }
            }
        }
    }

    mesh
}

fn is_opaque(registry: &BlockRegistry, id: crate::block::BlockId) -> bool {
    registry.get(id).map(|def| def.flags.contains(BlockFlags::OPAQUE)).unwrap_or(false)
}

fn emit_quad(
    mesh: &mut ChunkMesh,
    local: LocalBlockPos,
    state: crate::block::BlockState,
    face: Face,
    atlas: &dyn TextureAtlas,
) {
    let origin = Vec3::new(local.x as f32, local.y as f32, local.z as f32);
    let rotated_face = rotate_face(state.orientation(), face);
    let region = atlas.get_region(state, rotated_face);
    let normal = face.normal();
    let corners = face.corners();

    let quad = std::array::from_fn(|i| Vertex {
        position: origin + corners[i],
        normal,
        uv: region.uv[i],
        layer: region.layer,
        tint: Vec3::ONE,
    });

    mesh.push_quad(quad);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{registry, BlockState, Orientation};
    use crate::config::{ChunkSysConfig, EngineConfig, WorldGenConfig};
    use crate::world::ChunkPos;
    use glam::Vec2;

    struct FlatAtlas;
    impl TextureAtlas for FlatAtlas {
        fn get_region(&self, _state: BlockState, _face: Face) -> AtlasRegion {
            AtlasRegion { layer: 0, uv: [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y] }
        }
    }

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
    fn isolated_block_emits_six_faces() {
        let (_dir, mut level) = test_level();
        let pos = crate::world::pos::WorldBlockPos::new(5, 64, 5);
        level.set_block(pos, BlockState::new(registry::STONE, Orientation::North));

        let chunk = level.chunk(ChunkPos::new(0, 0)).unwrap();
        let registry = level.block_registry();
        let mesh = mesh_section(chunk, 4, &level, registry, &FlatAtlas);

        assert_eq!(mesh.indices.len(), 6 * 6);
        assert_eq!(mesh.vertices.len(), 6 * 4);
    }

    #[test]
    fn adjacent_solid_blocks_occlude_shared_face() {
        let (_dir, mut level) = test_level();
        level.set_block(
            crate::world::pos::WorldBlockPos::new(5, 64, 5),
            BlockState::new(registry::STONE, Orientation::North),
        );
        level.set_block(
            crate::world::pos::WorldBlockPos::new(6, 64, 5),
            BlockState::new(registry::STONE, Orientation::North),
        );

        let chunk = level.chunk(ChunkPos::new(0, 0)).unwrap();
        let registry = level.block_registry();
        let mesh = mesh_section(chunk, 4, &level, registry, &FlatAtlas);

        // Two isolated solids would be 12 faces; the shared face on each
        // side is occluded, leaving 10.
        assert_eq!(mesh.indices.len(), 10 * 6);
    }
}
