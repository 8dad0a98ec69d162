//! Rendering seam. The core owns mesh *data* (`mesher::{Vertex, ChunkMesh}`)
//! and the camera math that feeds `CCamera`; actual GPU upload, shaders, and
//! draw calls are a collaborator's responsibility.

use glam::{Mat4, Quat, Vec3};

pub use crate::mesher::{ChunkMesh, Vertex};

/// Opaque reference to a mesh the renderer has uploaded. `CMesh::mesh_ref`
/// stores the inner id; the core never interprets it beyond identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Upload/free seam a rendering collaborator implements; the mesher only
/// ever produces `ChunkMesh` values, never talks to the GPU directly.
pub trait MeshUploader {
    fn upload(&mut self, mesh: &ChunkMesh) -> MeshHandle;
    fn free(&mut self, handle: MeshHandle);
}

/// Hands out unique handles and does nothing else. Stands in for a real
/// GPU-backed `MeshUploader` until a rendering collaborator supplies one.
#[derive(Debug, Default)]
pub struct NoopMeshUploader {
    next: u64,
}

impl NoopMeshUploader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshUploader for NoopMeshUploader {
    fn upload(&mut self, _mesh: &ChunkMesh) -> MeshHandle {
        let handle = MeshHandle(self.next);
        self.next += 1;
        handle
    }

    fn free(&mut self, _handle: MeshHandle) {}
}

/// View/projection math shared between the first-person camera and any
/// `CCameraRig` follow camera; `CCamera` stores the resulting matrices so
/// systems don't recompute them every frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub fn compute(position: Vec3, rotation: Quat, fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let view = Mat4::from_rotation_translation(rotation, position).inverse();
        let projection = Mat4::perspective_rh(fov_degrees.to_radians(), aspect_ratio, near, far);
        Self { view, projection }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_at_origin_facing_identity_has_identity_view() {
        let matrices = CameraMatrices::compute(Vec3::ZERO, Quat::IDENTITY, 70.0, 16.0 / 9.0, 0.05, 1000.0);
        assert!(matrices.view.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}
