use glam::{IVec3, Vec3};

/// The six cardinal mesh faces a voxel can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::North, Face::South, Face::East, Face::West, Face::Top, Face::Bottom];

    pub const fn delta(self) -> IVec3 {
        match self {
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
            Face::Top => IVec3::new(0, 1, 0),
            Face::Bottom => IVec3::new(0, -1, 0),
        }
    }

    pub fn normal(self) -> Vec3 {
        let d = self.delta();
        Vec3::new(d.x as f32, d.y as f32, d.z as f32)
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Face::North | Face::South | Face::East | Face::West)
    }

    /// The four face-local corner offsets in winding order `(0,1,2,3)`
    /// matching the `(0,1,2),(0,2,3)` index pattern.
    pub const fn corners(self) -> [Vec3; 4] {
        match self {
            Face::North => [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            Face::South => [
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            Face::East => [
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            Face::West => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            Face::Top => [
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            Face::Bottom => [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        }
    }
}
