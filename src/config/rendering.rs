use serde::{Deserialize, Serialize};

/// Consumed only by the rendering collaborator; kept as a typed stub so
/// `Config` round-trips the whole file even though this crate does not
/// implement a renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    pub texture_atlas_size: u32,
    pub fov_degrees: f32,
    pub vsync: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            texture_atlas_size: 1024,
            fov_degrees: 70.0,
            vsync: true,
        }
    }
}
