use glam::Vec4;

use crate::render::sprite::{CameraUniform, SamplerSettings, SpriteVertex};

use super::CpuTexture;

/// Vertex stage output; the rasterizer interpolates `uv` and `color`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub clip_position: [f32; 4],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// `vs_main`: `view_proj * (x, y, 0, 1)`; uv and color pass through.
///
/// `viewport_size` is not read.
pub fn vertex_stage(camera: &CameraUniform, vertex: &SpriteVertex) -> VertexOutput {
    let [x, y] = vertex.position;
    let clip = camera.view_proj_matrix() * Vec4::new(x, y, 0.0, 1.0);
    VertexOutput {
        clip_position: clip.to_array(),
        uv: vertex.uv,
        color: vertex.color,
    }
}

/// `fs_main`: sampled texel times tint, all four channels.
pub fn fragment_stage(
    texture: &CpuTexture,
    sampler: SamplerSettings,
    input: &VertexOutput,
) -> [f32; 4] {
    let texel = texture.sample(input.uv, sampler);
    std::array::from_fn(|i| texel[i] * input.color[i])
}
