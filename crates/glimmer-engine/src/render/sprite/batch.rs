use std::ops::Range;

use crate::coords::Rect;
use crate::paint::Color;

use super::contract::TEXTURE_GROUP;
use super::pipeline::BlendMode;
use super::texture::SpriteTexture;
use super::vertex::{SpriteVertex, QUAD_INDICES};

/// Default quad limit per frame.
pub const DEFAULT_BATCH_CAPACITY: usize = 20_000;

/// Handle into a renderer's texture registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// The built-in 1×1 white texture; draws with it render the tint only.
    pub const WHITE: TextureId = TextureId(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A run of indices drawn with one texture bound at group 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRange {
    pub texture: TextureId,
    pub indices: Range<u32>,
}

/// CPU-side quad list for one frame plus the GPU buffers it is uploaded to.
///
/// Quads are drawn in push order. Consecutive quads with the same texture
/// share a [`DrawRange`], so one draw call covers each run.
pub struct SpriteBatch {
    label: String,
    capacity: usize,
    // decides how tints are written into vertices
    blend: BlendMode,

    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    ranges: Vec<DrawRange>,
    dropped: usize,
    uploaded: bool,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    gpu_capacity: usize, // quads
}

impl SpriteBatch {
    pub fn new(label: impl Into<String>, capacity: usize) -> Self {
        Self {
            label: label.into(),
            capacity,
            blend: BlendMode::PremultipliedAlpha,
            vertices: Vec::new(),
            indices: Vec::new(),
            ranges: Vec::new(),
            dropped: 0,
            uploaded: false,
            vertex_buffer: None,
            index_buffer: None,
            gpu_capacity: 0,
        }
    }

    /// Encodes tints for `blend`; must match the pipeline the batch is drawn with.
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    #[inline]
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Clears the CPU lists; GPU buffers are kept for reuse.
    pub fn begin(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.ranges.clear();
        self.dropped = 0;
        self.uploaded = false;
    }

    /// Appends a textured quad. Returns `false` if the batch is full.
    pub fn push_quad(&mut self, texture: TextureId, dst: Rect, uv: Rect, color: Color) -> bool {
        let tint = self.blend.encode_tint(color);
        self.push_vertices(texture, SpriteVertex::quad_rgba(dst, uv, tint))
    }

    /// Appends four vertices in [`QUAD_INDICES`] order.
    pub fn push_vertices(&mut self, texture: TextureId, quad: [SpriteVertex; 4]) -> bool {
        if self.quad_count() >= self.capacity {
            if self.dropped == 0 {
                log::warn!(
                    "{}: batch capacity of {} quads reached; further quads are dropped this frame",
                    self.label,
                    self.capacity
                );
            }
            self.dropped += 1;
            return false;
        }

        let base = self.vertices.len() as u32;
        let start = self.indices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        let end = self.indices.len() as u32;

        match self.ranges.last_mut() {
            Some(last) if last.texture == texture => last.indices.end = end,
            _ => self.ranges.push(DrawRange { texture, indices: start..end }),
        }
        self.uploaded = false;
        true
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Quads rejected since the last [`begin`](Self::begin).
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    // ── GPU ────────────────────────────────────────────────────────────────

    /// Writes this frame's geometry, growing the buffers if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.is_empty() {
            self.uploaded = true;
            return;
        }
        self.ensure_capacity(device, self.quad_count());

        let (Some(vbo), Some(ibo)) = (self.vertex_buffer.as_ref(), self.index_buffer.as_ref()) else {
            return;
        };
        queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
        queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.indices));
        self.uploaded = true;
    }

    /// Issues one indexed draw per range. The camera bind group and pipeline
    /// must already be set on `rpass`.
    pub fn record(&self, rpass: &mut wgpu::RenderPass<'_>, textures: &[SpriteTexture]) {
        if self.is_empty() {
            return;
        }
        if !self.uploaded {
            log::warn!("{}: record called before upload; skipping", self.label);
            return;
        }
        let (Some(vbo), Some(ibo)) = (self.vertex_buffer.as_ref(), self.index_buffer.as_ref()) else {
            return;
        };

        let vertex_bytes = (self.vertices.len() * std::mem::size_of::<SpriteVertex>()) as u64;
        let index_bytes = (self.indices.len() * std::mem::size_of::<u32>()) as u64;
        rpass.set_vertex_buffer(0, vbo.slice(..vertex_bytes));
        rpass.set_index_buffer(ibo.slice(..index_bytes), wgpu::IndexFormat::Uint32);

        for range in &self.ranges {
            let Some(texture) = textures.get(range.texture.index()) else {
                log::warn!("{}: unknown {:?}, skipping range", self.label, range.texture);
                continue;
            };
            rpass.set_bind_group(TEXTURE_GROUP, texture.bind_group(), &[]);
            rpass.draw_indexed(range.indices.clone(), 0, 0..1);
        }
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, quads: usize) {
        if quads <= self.gpu_capacity && self.vertex_buffer.is_some() && self.index_buffer.is_some() {
            return;
        }
        let new_cap = quads.next_power_of_two().max(64);

        self.vertex_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} vbo", self.label)),
            size: (new_cap * 4 * std::mem::size_of::<SpriteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.index_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} ibo", self.label)),
            size: (new_cap * QUAD_INDICES.len() * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        log::debug!("{}: buffers grown to {new_cap} quads", self.label);
        self.gpu_capacity = new_cap;
    }
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new("glimmer sprite batch", DEFAULT_BATCH_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TextureId = TextureId(1);
    const B: TextureId = TextureId(2);

    fn push(batch: &mut SpriteBatch, tex: TextureId) -> bool {
        batch.push_quad(tex, Rect::new(0.0, 0.0, 4.0, 4.0), Rect::UNIT, Color::WHITE)
    }

    // ── ranges ─────────────────────────────────────────────────────────────

    #[test]
    fn consecutive_quads_with_same_texture_share_a_range() {
        let mut batch = SpriteBatch::default();
        push(&mut batch, A);
        push(&mut batch, A);
        push(&mut batch, A);
        assert_eq!(batch.ranges(), &[DrawRange { texture: A, indices: 0..18 }]);
    }

    #[test]
    fn texture_switch_starts_new_range_in_push_order() {
        let mut batch = SpriteBatch::default();
        push(&mut batch, A);
        push(&mut batch, B);
        push(&mut batch, A);
        assert_eq!(
            batch.ranges(),
            &[
                DrawRange { texture: A, indices: 0..6 },
                DrawRange { texture: B, indices: 6..12 },
                DrawRange { texture: A, indices: 12..18 },
            ]
        );
    }

    #[test]
    fn indices_are_offset_per_quad() {
        let mut batch = SpriteBatch::default();
        push(&mut batch, A);
        push(&mut batch, A);
        assert_eq!(&batch.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(batch.vertices().len(), 8);
    }

    // ── capacity ───────────────────────────────────────────────────────────

    #[test]
    fn overflow_drops_quads_and_counts_them() {
        let mut batch = SpriteBatch::new("test", 2);
        assert!(push(&mut batch, A));
        assert!(push(&mut batch, B));
        assert!(!push(&mut batch, A));
        assert!(!push(&mut batch, A));
        assert_eq!(batch.quad_count(), 2);
        assert_eq!(batch.dropped(), 2);
        assert_eq!(batch.ranges().len(), 2);
    }

    #[test]
    fn begin_resets_frame_state() {
        let mut batch = SpriteBatch::new("test", 1);
        push(&mut batch, A);
        push(&mut batch, A);
        batch.begin();
        assert!(batch.is_empty());
        assert_eq!(batch.dropped(), 0);
        assert!(batch.ranges().is_empty());
        assert!(push(&mut batch, B));
    }

    // ── tint encoding ──────────────────────────────────────────────────────

    #[test]
    fn straight_alpha_batch_writes_straight_tints() {
        let half_red = Color::from_straight(1.0, 0.0, 0.0, 0.5);
        let dst = Rect::new(0.0, 0.0, 4.0, 4.0);

        let mut premul = SpriteBatch::default();
        premul.push_quad(A, dst, Rect::UNIT, half_red);
        assert!(premul.vertices().iter().all(|v| v.color == [0.5, 0.0, 0.0, 0.5]));

        let mut straight = SpriteBatch::default().with_blend(BlendMode::Alpha);
        straight.push_quad(A, dst, Rect::UNIT, half_red);
        assert!(straight.vertices().iter().all(|v| v.color == [1.0, 0.0, 0.0, 0.5]));
    }

    #[test]
    fn white_is_texture_zero() {
        assert_eq!(TextureId::WHITE.index(), 0);
        assert_eq!(TextureId::from_index(3).index(), 3);
    }
}
