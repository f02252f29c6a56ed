use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::paint::Color;

/// Index pattern for one quad: two triangles sharing the 0-2 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Per-vertex input of the sprite pass.
///
/// Layout (32 bytes):
///
///  offset  0  position  [f32; 2]   loc 0
///  offset  8  uv        [f32; 2]   loc 1
///  offset 16  color     [f32; 4]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<SpriteVertex>() == 32);

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    #[inline]
    pub const fn new(position: [f32; 2], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, uv, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Four vertices mapping `uv` onto `dst`, in [`QUAD_INDICES`] order,
    /// carrying `color` premultiplied.
    pub fn quad(dst: Rect, uv: Rect, color: Color) -> [SpriteVertex; 4] {
        Self::quad_rgba(dst, uv, color.to_array())
    }

    /// Like [`quad`](Self::quad) with the vertex color already encoded.
    pub fn quad_rgba(dst: Rect, uv: Rect, color: [f32; 4]) -> [SpriteVertex; 4] {
        let p = dst.corners();
        let t = uv.corners();
        [
            SpriteVertex::new(p[0].to_array(), t[0].to_array(), color),
            SpriteVertex::new(p[1].to_array(), t[1].to_array(), color),
            SpriteVertex::new(p[2].to_array(), t[2].to_array(), color),
            SpriteVertex::new(p[3].to_array(), t[3].to_array(), color),
        ]
    }
}
