use glam::Vec2;

use crate::camera::Camera2D;
use crate::paint::Color;

use super::{TextAlign, TextStyle};

/// Fixed character grid anchored at the top-left of the camera view.
///
/// Columns and rows may be fractional. Text drawn on the grid uses a pixel
/// size equal to the cell height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextGrid {
    /// Unscaled cell size in pixels.
    pub cell: Vec2,
    pub scale: f32,
}

impl TextGrid {
    pub const fn new(cell: Vec2, scale: f32) -> Self {
        Self { cell, scale }
    }

    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell.x * self.scale
    }

    #[inline]
    pub fn cell_height(&self) -> f32 {
        self.cell.y * self.scale
    }

    /// World position of the top-left corner of cell `(col, row)`.
    pub fn cell_origin(&self, camera: &Camera2D, col: f32, row: f32) -> Vec2 {
        let (left, _, top, _) = camera.visible_bounds();
        Vec2::new(left + col * self.cell_width(), top + row * self.cell_height())
    }

    /// Anchor for text centered horizontally on the view at `row`.
    pub fn centered_origin(&self, camera: &Camera2D, row: f32) -> Vec2 {
        let (_, _, top, _) = camera.visible_bounds();
        Vec2::new(camera.position.x, top + row * self.cell_height())
    }

    pub fn screen_cols(&self, camera: &Camera2D) -> f32 {
        let (left, right, _, _) = camera.visible_bounds();
        (right - left) / self.cell_width()
    }

    pub fn screen_rows(&self, camera: &Camera2D) -> f32 {
        let (_, _, top, bottom) = camera.visible_bounds();
        (bottom - top) / self.cell_height()
    }

    pub fn style(&self, color: Color) -> TextStyle {
        TextStyle::new(self.cell_height()).with_color(color)
    }

    pub fn centered_style(&self, color: Color) -> TextStyle {
        self.style(color).with_align(TextAlign::Center)
    }
}

impl Default for TextGrid {
    fn default() -> Self {
        Self::new(Vec2::new(8.0, 8.0), 2.0)
    }
}
