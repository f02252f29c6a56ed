//! Coordinate and geometry types shared by the camera, batching and text.
//!
//! Canonical world space for sprites:
//! - pixels
//! - origin wherever the camera says (the camera position is the view center)
//! - +X right, +Y down
//!
//! The sprite vertex shader maps world space to clip space with the camera's
//! `view_proj` matrix. Vectors are `glam::Vec2`.

mod rect;
mod viewport;

pub use glam::Vec2;
pub use rect::Rect;
pub use viewport::Viewport;
