//! Axis-aligned bounding box in world space. The physics handler code
//! this engine grew from referenced an `AABB` with this shape without the
//! module itself ever landing in the tree; this fills that gap.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Builds the world-space box for an entity at `position` with local
    /// offsets `bb_min`/`bb_max` (as stored on `CPhysics`).
    pub fn from_local(position: Vec3, bb_min: Vec3, bb_max: Vec3) -> Self {
        Self { min: position + bb_min, max: position + bb_max }
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }

    /// Inclusive-bounds interval overlap on all three axes.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_detects_touching_boxes_inclusive() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn overlap_false_when_separated() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        assert!(!a.overlaps(&b));
    }
}
