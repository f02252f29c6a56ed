use std::collections::HashMap;

use fontdue::layout::GlyphRasterConfig;

use crate::coords::Rect;
use crate::render::SpriteError;
use crate::render::sprite::{expand_mask, BlendMode, SpriteTexture, TextureId};

use super::atlas::{AtlasPacker, AtlasSlot};
use super::{FontId, FontSystem};

/// Default edge length of the glyph atlas texture.
pub const DEFAULT_ATLAS_SIZE: u32 = 1024;

/// Glyph bitmaps rasterized on first use into one RGBA atlas texture.
///
/// Keyed by `GlyphRasterConfig` (font, glyph index, pixel size), so a glyph
/// repeated across draws is rasterized and uploaded once.
pub struct GlyphCache {
    texture: TextureId,
    packer: AtlasPacker,
    // `None` records a glyph that did not fit so it is not retried every frame.
    glyphs: HashMap<GlyphRasterConfig, Option<Rect>>,
}

impl GlyphCache {
    /// `texture` must name a registered atlas texture of `size × size`.
    pub fn new(texture: TextureId, size: u32) -> Self {
        Self {
            texture,
            packer: AtlasPacker::new(size),
            glyphs: HashMap::new(),
        }
    }

    #[inline]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Forgets every glyph. Later lookups overwrite stale atlas contents.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.packer.reset();
    }

    /// Atlas uv rectangle of `key`, rasterizing and uploading it if needed.
    pub fn uv(
        &mut self,
        fonts: &FontSystem,
        font: FontId,
        key: GlyphRasterConfig,
        queue: &wgpu::Queue,
        atlas: &SpriteTexture,
        blend: BlendMode,
    ) -> Option<Rect> {
        self.resolve(fonts, font, key, blend, |slot, rgba| {
            atlas.write_region(queue, slot.x, slot.y, slot.width, slot.height, rgba)
        })
    }

    /// Cache lookup; on a miss rasterizes `key`, packs it and hands the RGBA
    /// bitmap to `upload`.
    fn resolve<F>(
        &mut self,
        fonts: &FontSystem,
        font: FontId,
        key: GlyphRasterConfig,
        blend: BlendMode,
        upload: F,
    ) -> Option<Rect>
    where
        F: FnOnce(&AtlasSlot, &[u8]) -> Result<(), SpriteError>,
    {
        if let Some(cached) = self.glyphs.get(&key) {
            return *cached;
        }

        let font = fonts.get(font)?;
        let (metrics, bitmap) = font.rasterize_config(key);
        if metrics.width == 0 || metrics.height == 0 {
            self.glyphs.insert(key, None);
            return None;
        }

        let (w, h) = (metrics.width as u32, metrics.height as u32);
        let uv = self.packer.allocate(w, h).and_then(|slot| {
            let rgba = expand_mask(&bitmap, blend);
            match upload(&slot, &rgba) {
                Ok(()) => Some(slot.uv),
                Err(e) => {
                    log::warn!("glyph upload failed: {e}");
                    None
                }
            }
        });

        self.glyphs.insert(key, uv);
        uv
    }
}
