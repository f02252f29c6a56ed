use std::path::Path;

use glam::Vec2;

use crate::camera::Camera2D;
use crate::coords::{Rect, Viewport};
use crate::paint::{palette, Color};
use crate::text::{layout_text, FontId, FontLoadError, FontSystem, GlyphCache, TextGrid, TextStyle};
use crate::text::DEFAULT_ATLAS_SIZE;

use super::error::SpriteError;
use super::sprite::{
    CameraBinding, SamplerSettings, SpriteBatch, SpritePipeline, SpritePipelineConfig,
    SpriteTexture, TextureColorSpace, TextureDesc, TextureId, CAMERA_GROUP,
    DEFAULT_BATCH_CAPACITY,
};
use super::RenderTarget;

/// Construction parameters for [`SpriteRenderer`].
#[derive(Debug, Clone)]
pub struct SpriteRendererConfig {
    pub pipeline: SpritePipelineConfig,
    /// Quads accepted per frame before further draws are dropped.
    pub batch_capacity: usize,
    /// Edge length of the square glyph atlas.
    pub atlas_size: u32,
    /// Suggested clear color for hosts that clear before [`SpriteRenderer::render`].
    pub clear_color: Color,
}

impl Default for SpriteRendererConfig {
    fn default() -> Self {
        Self {
            pipeline: SpritePipelineConfig::default(),
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            atlas_size: DEFAULT_ATLAS_SIZE,
            clear_color: palette::BACKDROP,
        }
    }
}

/// Counters for one frame, returned by [`SpriteRenderer::end`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub quads: usize,
    pub draw_calls: usize,
    /// Quads rejected because the batch was full.
    pub dropped: usize,
    /// Quads skipped because they were outside the camera view.
    pub culled: usize,
}

/// Sprite and text drawing through the sprite pass.
///
/// Per frame: [`begin`](Self::begin), any number of `draw_*` calls,
/// [`end`](Self::end) to upload, then [`render`](Self::render) to record
/// the pass. Draws are composited in call order.
pub struct SpriteRenderer {
    pipeline: SpritePipeline,
    camera: Camera2D,
    camera_binding: CameraBinding,

    // texture registry; index = TextureId
    textures: Vec<SpriteTexture>,

    batch: SpriteBatch,
    culled: usize,

    fonts: FontSystem,
    default_font: Option<FontId>,
    glyphs: GlyphCache,
    grid: TextGrid,
    missing_font_warned: bool,

    clear_color: Color,
}

impl SpriteRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: SpriteRendererConfig,
    ) -> Result<Self, SpriteError> {
        let pipeline = SpritePipeline::new(device, &config.pipeline)?;
        let camera_binding = pipeline.create_camera_binding(device);

        let white = SpriteTexture::white(device, queue, &pipeline)?;
        let atlas_desc = TextureDesc::new("glimmer glyph atlas", config.atlas_size, config.atlas_size)
            .with_color_space(TextureColorSpace::Linear)
            .with_sampler(SamplerSettings::SMOOTH);
        let atlas = SpriteTexture::empty(device, &pipeline, &atlas_desc)?;

        let textures = vec![white, atlas];
        let glyphs = GlyphCache::new(TextureId::from_index(1), config.atlas_size);
        let batch = SpriteBatch::new("glimmer sprite batch", config.batch_capacity)
            .with_blend(pipeline.blend());

        log::debug!(
            "sprite renderer ready (batch capacity {}, atlas {}²)",
            config.batch_capacity,
            config.atlas_size
        );

        Ok(Self {
            pipeline,
            camera: Camera2D::default(),
            camera_binding,
            textures,
            batch,
            culled: 0,
            fonts: FontSystem::new(),
            default_font: None,
            glyphs,
            grid: TextGrid::default(),
            missing_font_warned: false,
            clear_color: config.clear_color,
        })
    }

    // ── resources ──────────────────────────────────────────────────────────

    pub fn add_texture(&mut self, texture: SpriteTexture) -> TextureId {
        let id = TextureId::from_index(self.textures.len() as u32);
        self.textures.push(texture);
        id
    }

    /// Creates and registers a texture from RGBA8 rows.
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        desc: &TextureDesc<'_>,
        rgba: &[u8],
    ) -> Result<TextureId, SpriteError> {
        let texture = SpriteTexture::from_rgba8(device, queue, &self.pipeline, desc, rgba)?;
        Ok(self.add_texture(texture))
    }

    /// Decodes and registers a PNG or JPEG image.
    pub fn load_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        bytes: &[u8],
        sampler: SamplerSettings,
    ) -> Result<TextureId, SpriteError> {
        let texture =
            SpriteTexture::from_image_bytes(device, queue, &self.pipeline, label, bytes, sampler)?;
        Ok(self.add_texture(texture))
    }

    pub fn texture(&self, id: TextureId) -> Result<&SpriteTexture, SpriteError> {
        self.textures.get(id.index()).ok_or(SpriteError::UnknownTexture(id))
    }

    #[inline]
    pub fn pipeline(&self) -> &SpritePipeline {
        &self.pipeline
    }

    // ── fonts ──────────────────────────────────────────────────────────────

    /// Loads a font; the first one loaded becomes the default for grid text.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let id = self.fonts.load_font(bytes)?;
        self.default_font.get_or_insert(id);
        Ok(id)
    }

    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<FontId, FontLoadError> {
        let id = self.fonts.load_file(path)?;
        self.default_font.get_or_insert(id);
        Ok(id)
    }

    pub fn set_default_font(&mut self, font: FontId) {
        self.default_font = Some(font);
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    // ── camera ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }

    #[inline]
    pub fn grid(&self) -> &TextGrid {
        &self.grid
    }

    pub fn set_grid(&mut self, grid: TextGrid) {
        self.grid = grid;
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    // ── frame ──────────────────────────────────────────────────────────────

    pub fn begin(&mut self) {
        self.batch.begin();
        self.culled = 0;
    }

    /// Queues a quad showing the `uv` region of `texture` over `dst`.
    ///
    /// Returns `false` if the quad was culled, dropped, or names an unknown
    /// texture.
    pub fn draw_sprite(&mut self, texture: TextureId, dst: Rect, uv: Rect, color: Color) -> bool {
        if texture.index() >= self.textures.len() {
            log::warn!("draw_sprite: unknown {texture:?}");
            return false;
        }
        if self.camera.visible_rect().intersect(dst).is_none() {
            self.culled += 1;
            return false;
        }
        self.batch.push_quad(texture, dst, uv, color)
    }

    /// Untextured quad in `color`.
    pub fn draw_rect(&mut self, dst: Rect, color: Color) -> bool {
        self.draw_sprite(TextureId::WHITE, dst, Rect::UNIT, color)
    }

    /// Lays out and queues `text`; returns the number of glyph quads queued.
    pub fn draw_text(
        &mut self,
        queue: &wgpu::Queue,
        font: FontId,
        text: &str,
        pos: Vec2,
        style: &TextStyle,
    ) -> usize {
        let atlas_id = self.glyphs.texture();
        let blend = self.pipeline.blend();
        let visible = self.camera.visible_rect();

        let mut queued = 0;
        for glyph in layout_text(&self.fonts, font, text, pos, style) {
            if visible.intersect(glyph.rect).is_none() {
                self.culled += 1;
                continue;
            }
            let Some(atlas) = self.textures.get(atlas_id.index()) else { break };
            let Some(uv) = self.glyphs.uv(&self.fonts, font, glyph.key, queue, atlas, blend) else {
                continue;
            };
            if self.batch.push_quad(atlas_id, glyph.rect, uv, style.color) {
                queued += 1;
            }
        }
        queued
    }

    /// Text at grid cell `(col, row)` in the default font.
    pub fn draw_at_grid(&mut self, queue: &wgpu::Queue, text: &str, col: f32, row: f32, color: Color) -> usize {
        let Some(font) = self.font_for_grid() else { return 0 };
        let pos = self.grid.cell_origin(&self.camera, col, row);
        let style = self.grid.style(color);
        self.draw_text(queue, font, text, pos, &style)
    }

    /// One grid row per line, starting at `(col, row)`.
    pub fn draw_multiline_at_grid(
        &mut self,
        queue: &wgpu::Queue,
        text: &str,
        col: f32,
        row: f32,
        color: Color,
    ) -> usize {
        text.lines()
            .enumerate()
            .map(|(i, line)| self.draw_at_grid(queue, line, col, row + i as f32, color))
            .sum()
    }

    /// Text centered horizontally on the view at `row`.
    pub fn draw_centered(&mut self, queue: &wgpu::Queue, text: &str, row: f32, color: Color) -> usize {
        let Some(font) = self.font_for_grid() else { return 0 };
        let pos = self.grid.centered_origin(&self.camera, row);
        let style = self.grid.centered_style(color);
        self.draw_text(queue, font, text, pos, &style)
    }

    pub fn draw_multiline_centered(
        &mut self,
        queue: &wgpu::Queue,
        text: &str,
        start_row: f32,
        color: Color,
    ) -> usize {
        text.lines()
            .enumerate()
            .map(|(i, line)| self.draw_centered(queue, line, start_row + i as f32, color))
            .sum()
    }

    /// Uploads the camera and this frame's geometry.
    pub fn end(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> FrameStats {
        self.camera_binding.write(queue, &self.camera.to_uniform());
        self.batch.upload(device, queue);
        FrameStats {
            quads: self.batch.quad_count(),
            draw_calls: self.batch.ranges().len(),
            dropped: self.batch.dropped(),
            culled: self.culled,
        }
    }

    /// Records the sprite pass over the existing contents of `target`.
    pub fn render(&self, target: &mut RenderTarget<'_>) {
        if self.batch.is_empty() {
            return;
        }

        let mut rpass = target.begin_pass("glimmer sprite pass", wgpu::LoadOp::Load);

        rpass.set_pipeline(self.pipeline.render_pipeline());
        rpass.set_bind_group(CAMERA_GROUP, self.camera_binding.bind_group(), &[]);
        self.batch.record(&mut rpass, &self.textures);
    }

    fn font_for_grid(&mut self) -> Option<FontId> {
        if self.default_font.is_none() && !self.missing_font_warned {
            log::warn!("grid text requested but no font is loaded");
            self.missing_font_warned = true;
        }
        self.default_font
    }
}
