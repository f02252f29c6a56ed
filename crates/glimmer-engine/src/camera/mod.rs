//! World-to-clip transform for the sprite pass.

mod camera2d;

pub use camera2d::{Camera2D, MAX_ZOOM, MIN_ZOOM};
