use glam::Vec2;

/// Viewport size in pixels.
///
/// The camera derives its visible extent from this, and the value is copied
/// into `CameraUniform::viewport_size`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns the size clamped to at least one pixel per axis.
    ///
    /// Projection math divides by the viewport size; a minimized window reports 0×0.
    #[inline]
    pub fn clamped(self) -> Self {
        let w = if self.width.is_finite() { self.width.max(1.0) } else { 1.0 };
        let h = if self.height.is_finite() { self.height.max(1.0) } else { 1.0 };
        Self::new(w, h)
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}
