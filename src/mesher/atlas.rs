//! Texture atlas contract consumed by the mesher. The atlas
//! itself is a rendering collaborator; the mesher only needs `get_region`.

use glam::Vec2;

use crate::block::{BlockState, Orientation};

use super::faces::Face;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    pub layer: u32,
    pub uv: [Vec2; 4],
}

pub trait TextureAtlas {
    fn get_region(&self, state: BlockState, face: Face) -> AtlasRegion;
}

/// Placeholder atlas mapping every face to layer 0's full UV square.
/// Stands in for a real atlas until a rendering collaborator supplies one.
#[derive(Debug, Default)]
pub struct NullAtlas;

impl TextureAtlas for NullAtlas {
    fn get_region(&self, _state: BlockState, _face: Face) -> AtlasRegion {
        AtlasRegion { layer: 0, uv: [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)] }
    }
}

/// Rotates a horizontal `face` by `orientation`'s facing so that e.g. a
/// furnace's front texture tracks the block's placed direction. Top and
/// bottom are unaffected.
pub fn rotate_face(orientation: Orientation, face: Face) -> Face {
    if !face.is_horizontal() || !orientation.is_horizontal() {
        return face;
    }

    const ORDER: [Face; 4] = [Face::North, Face::East, Face::South, Face::West];
    let face_idx = ORDER.iter().position(|&f| f == face).expect("face is horizontal");
    let rotation_steps = orientation.bits() as usize;
    ORDER[(face_idx + rotation_steps) % 4]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_and_bottom_are_unrotated() {
        assert_eq!(rotate_face(Orientation::East, Face::Top), Face::Top);
        assert_eq!(rotate_face(Orientation::East, Face::Bottom), Face::Bottom);
    }

    #[test]
    fn north_orientation_is_identity() {
        for face in [Face::North, Face::East, Face::South, Face::West] {
            assert_eq!(rotate_face(Orientation::North, face), face);
        }
    }

    #[test]
    fn rotation_cycles_through_horizontal_faces() {
        assert_eq!(rotate_face(Orientation::East, Face::North), Face::East);
        assert_eq!(rotate_face(Orientation::South, Face::North), Face::South);
        assert_eq!(rotate_face(Orientation::West, Face::North), Face::West);
    }
}
