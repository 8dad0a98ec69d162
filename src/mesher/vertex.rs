use glam::{Vec2, Vec3};

/// One mesh vertex. The atlas array layer travels as a separate `layer`
/// field alongside `uv` rather than a parallel array, so a vertex carries
/// everything a renderer needs to sample the right atlas slice on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub layer: u32,
    pub tint: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Appends a quad from four CCW vertices with the standard
    /// `(0,1,2),(0,2,3)` winding.
    pub fn push_quad(&mut self, quad: [Vertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}
