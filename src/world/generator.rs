//! Column-wise fBm terrain generation.

use noise::{NoiseFn, Perlin};

use crate::block::{registry, BlockId, BlockState, Orientation};
use crate::config::WorldGenConfig;
use crate::world::pos::{ChunkPos, LocalBlockPos, CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Seeded fBm Perlin terrain height field.
pub struct TerrainGenerator {
    perlin: Perlin,
    octaves: usize,
    base_frequency: f64,
    min_height: i32,
    max_height: i32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, cfg: &WorldGenConfig) -> Self {
        Self {
            perlin: Perlin::new(seed),
            octaves: cfg.octaves,
            base_frequency: cfg.base_frequency,
            min_height: cfg.min_height,
            max_height: cfg.max_height,
        }
    }

    /// fBm sum of `octaves` layers, each doubling frequency and halving
    /// amplitude, then remapped from `[-1,1]` into `[min_height, max_height]`.
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let mut amplitude = 1.0;
        let mut frequency = self.base_frequency;
        let mut sum = 0.0;
        let mut amplitude_total = 0.0;

        for _ in 0..self.octaves {
            let nx = world_x as f64 * frequency;
            let nz = world_z as f64 * frequency;
            sum += self.perlin.get([nx, nz]) * amplitude;
            amplitude_total += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = (sum / amplitude_total).clamp(-1.0, 1.0) * 0.5 + 0.5;
        let range = (self.max_height - self.min_height) as f64;
        (self.min_height as f64 + normalized * range) as i32
    }

    /// Fills every column of a chunk with the generated column: surface
    /// is `Dirt`, below is `Stone`, `y==0` is `Bedrock`, above the surface
    /// height is `Air`.
    pub fn generate_chunk_blocks(&self, chunk_pos: ChunkPos) -> Vec<(LocalBlockPos, BlockState)> {
        let mut out = Vec::new();
        let origin = chunk_pos.to_world_origin();

        for lx in 0..CHUNK_SIZE_X {
            for lz in 0..CHUNK_SIZE_Z {
                let world_x = origin.x() + lx;
                let world_z = origin.z() + lz;
                let height = self.height_at(world_x, world_z).clamp(self.min_height, self.max_height);

                for y in 0..=height.max(0) {
                    let id = if y == 0 {
                        registry::BEDROCK
                    } else if y == height {
                        registry::DIRT
                    } else {
                        registry::STONE
                    };
                    if id == BlockId::AIR {
                        continue;
                    }
                    out.push((
                        LocalBlockPos::new(lx, y, lz),
                        BlockState::new(id, Orientation::North),
                    ));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_clamped_to_configured_range() {
        let cfg = WorldGenConfig::default();
        let gen = TerrainGenerator::new(1234, &cfg);
        for x in (-500..500).step_by(37) {
            let h = gen.height_at(x, -x);
            assert!(h >= cfg.min_height && h <= cfg.max_height);
        }
    }

    #[test]
    fn bedrock_forms_the_floor() {
        let cfg = WorldGenConfig::default();
        let gen = TerrainGenerator::new(1234, &cfg);
        let blocks = gen.generate_chunk_blocks(ChunkPos::new(0, 0));
        let bedrock_present = blocks
            .iter()
            .any(|(pos, state)| pos.y == 0 && state.id() == registry::BEDROCK);
        assert!(bedrock_present);
    }
}
