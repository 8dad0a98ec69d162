use glam::IVec3;
use serde::{Deserialize, Serialize};

pub const CHUNK_SIZE_X: i32 = 16;
pub const CHUNK_SIZE_Z: i32 = 16;
pub const SECTION_SIZE: i32 = 16;
pub const SECTIONS_PER_CHUNK: i32 = 16;
pub const CHUNK_SIZE_Y: i32 = SECTION_SIZE * SECTIONS_PER_CHUNK;

/// A world-space integer block position. Nominally distinct from
/// `LocalBlockPos` to prevent mixing at interface boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldBlockPos(pub IVec3);

impl WorldBlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        WorldBlockPos(IVec3::new(x, y, z))
    }

    pub fn x(self) -> i32 {
        self.0.x
    }
    pub fn y(self) -> i32 {
        self.0.y
    }
    pub fn z(self) -> i32 {
        self.0.z
    }

    /// Splits into owning chunk coordinate and chunk-local position, using
    /// a branchless sign-correcting floor division.
    pub fn split(self) -> (ChunkPos, LocalBlockPos) {
        let cx = floor_div(self.0.x, CHUNK_SIZE_X);
        let cz = floor_div(self.0.z, CHUNK_SIZE_Z);
        let lx = self.0.x - cx * CHUNK_SIZE_X;
        let ly = self.0.y;
        let lz = self.0.z - cz * CHUNK_SIZE_Z;
        (ChunkPos::new(cx, cz), LocalBlockPos::new(lx, ly, lz))
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        WorldBlockPos(self.0 + IVec3::new(dx, dy, dz))
    }
}

/// Section/chunk-relative position: x,z in `0..16`, y in `0..256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalBlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl LocalBlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn in_chunk_bounds(self) -> bool {
        (0..CHUNK_SIZE_X).contains(&self.x)
            && (0..CHUNK_SIZE_Y).contains(&self.y)
            && (0..CHUNK_SIZE_Z).contains(&self.z)
    }

    pub fn section_index(self) -> i32 {
        self.y.div_euclid(SECTION_SIZE)
    }

    pub fn local_y_in_section(self) -> i32 {
        self.y.rem_euclid(SECTION_SIZE)
    }

    /// `x + z*16 + y*16*16`, y section-local.
    pub fn section_block_index(self) -> usize {
        let ly = self.local_y_in_section();
        (self.x + self.z * SECTION_SIZE + ly * SECTION_SIZE * SECTION_SIZE) as usize
    }

    /// `true` if this local position sits on the chunk's XZ boundary.
    pub fn on_xz_boundary(self) -> bool {
        matches!(self.x, 0 | 15) || matches!(self.z, 0 | 15)
    }
}

/// Chunk coordinate (2D — chunks span the full Y range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn to_world_origin(self) -> WorldBlockPos {
        WorldBlockPos::new(self.x * CHUNK_SIZE_X, 0, self.z * CHUNK_SIZE_Z)
    }

    /// Chebyshev distance to `other`, used by `UpdateStreaming`.
    pub fn chebyshev_distance(self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    pub fn neighbors4(self) -> [ChunkPos; 4] {
        [
            ChunkPos::new(self.x - 1, self.z),
            ChunkPos::new(self.x + 1, self.z),
            ChunkPos::new(self.x, self.z - 1),
            ChunkPos::new(self.x, self.z + 1),
        ]
    }
}

impl std::hash::Hash for ChunkPos {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Golden-ratio mixer combining the two components.
        const GOLDEN: u64 = 0x9E3779B97F4A7C15;
        let x = self.x as i64 as u64;
        let z = self.z as i64 as u64;
        let mixed = x.wrapping_mul(GOLDEN) ^ z.wrapping_mul(GOLDEN).rotate_left(32);
        state.write_u64(mixed);
    }
}

/// Branchless sign-correcting floor division.
pub fn floor_div(value: i32, size: i32) -> i32 {
    let q = value / size;
    let r = value % size;
    q - (((r != 0) && ((r < 0) != (size < 0))) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_handles_negatives() {
        assert_eq!(floor_div(-1, 16), -1);
        assert_eq!(floor_div(-16, 16), -1);
        assert_eq!(floor_div(-17, 16), -2);
        assert_eq!(floor_div(15, 16), 0);
        assert_eq!(floor_div(16, 16), 1);
    }

    #[test]
    fn split_round_trips() {
        let p = WorldBlockPos::new(-1, 64, 17);
        let (chunk, local) = p.split();
        assert_eq!(chunk, ChunkPos::new(-1, 1));
        assert_eq!(local, LocalBlockPos::new(15, 64, 1));
    }

    #[test]
    fn section_index_formula() {
        let local = LocalBlockPos::new(3, 20, 5);
        assert_eq!(local.section_index(), 1);
        assert_eq!(local.local_y_in_section(), 4);
        assert_eq!(local.section_block_index(), 3 + 5 * 16 + 4 * 16 * 16);
    }

    #[test]
    fn xz_boundary_detection() {
        assert!(LocalBlockPos::new(0, 5, 5).on_xz_boundary());
        assert!(LocalBlockPos::new(15, 5, 5).on_xz_boundary());
        assert!(LocalBlockPos::new(5, 5, 0).on_xz_boundary());
        assert!(!LocalBlockPos::new(5, 5, 5).on_xz_boundary());
    }
}
