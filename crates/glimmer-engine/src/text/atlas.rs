use crate::coords::Rect;

/// Pixels left empty around every slot so linear filtering never bleeds.
pub const ATLAS_PADDING: u32 = 1;

/// A region handed out by [`AtlasPacker::allocate`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasSlot {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// The same region in normalized texture coordinates.
    pub uv: Rect,
}

/// Shelf packer: fills rows left to right, opens a new row below when the
/// current one runs out, and reports full once rows run out.
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl AtlasPacker {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: ATLAS_PADDING,
            cursor_y: ATLAS_PADDING,
            row_height: 0,
            full: false,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    /// Reserves a `width × height` region, or `None` when it no longer fits.
    ///
    /// Once a request fails for lack of rows every later request fails too;
    /// call [`reset`](Self::reset) after clearing the texture.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<AtlasSlot> {
        if self.full {
            return None;
        }
        if width + 2 * ATLAS_PADDING > self.size || height + 2 * ATLAS_PADDING > self.size {
            log::warn!("atlas: {width}x{height} region can never fit a {0}x{0} atlas", self.size);
            return None;
        }

        if self.cursor_x + width + ATLAS_PADDING > self.size {
            self.cursor_y += self.row_height + ATLAS_PADDING;
            self.cursor_x = ATLAS_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + height + ATLAS_PADDING > self.size {
            log::warn!(
                "atlas: {0}x{0} atlas is full; further glyphs will not be rendered",
                self.size
            );
            self.full = true;
            return None;
        }

        let (x, y) = (self.cursor_x, self.cursor_y);
        self.cursor_x += width + ATLAS_PADDING;
        self.row_height = self.row_height.max(height);

        let s = self.size as f32;
        Some(AtlasSlot {
            x,
            y,
            width,
            height,
            uv: Rect::new(x as f32 / s, y as f32 / s, width as f32 / s, height as f32 / s),
        })
    }
}
