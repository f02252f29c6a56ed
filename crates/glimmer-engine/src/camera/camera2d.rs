use glam::{Mat4, Vec2};

use crate::coords::{Rect, Viewport};
use crate::render::sprite::CameraUniform;

pub const MIN_ZOOM: f32 = 0.01;
pub const MAX_ZOOM: f32 = 100.0;

/// Orthographic 2D camera over a y-down world measured in pixels.
///
/// `position` is the world point shown at the center of the viewport. At
/// zoom 1 one world unit covers one pixel; larger zoom shows less of the world.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    viewport: Viewport,
    zoom: f32,
}

impl Camera2D {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: viewport.clamped(),
            zoom: 1.0,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.clamped();
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Sets the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// World-space edges of the view as `(left, right, top, bottom)`.
    pub fn visible_bounds(&self) -> (f32, f32, f32, f32) {
        let half = self.viewport.size() / (2.0 * self.zoom);
        (
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y - half.y,
            self.position.y + half.y,
        )
    }

    pub fn visible_rect(&self) -> Rect {
        let (left, right, top, bottom) = self.visible_bounds();
        Rect::from_corners(Vec2::new(left, top), Vec2::new(right, bottom))
    }

    /// Maps the visible bounds onto clip space: left/right to x = ∓1,
    /// top/bottom to y = ±1. World z = 0 lands at depth 0.
    pub fn view_proj(&self) -> Mat4 {
        let (left, right, top, bottom) = self.visible_bounds();
        Mat4::orthographic_rh(left, right, bottom, top, 0.0, 1.0)
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view_proj(), self.viewport.size())
    }

    /// Pixel position (top-left origin) to world position.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let (left, _, top, _) = self.visible_bounds();
        Vec2::new(left, top) + screen / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let (left, _, top, _) = self.visible_bounds();
        (world - Vec2::new(left, top)) * self.zoom
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Viewport::new(1.0, 1.0))
    }
}
