//! glimmer engine: a 2D sprite/text render pass on wgpu.
//!
//! The pass is one WGSL program (`render::sprite`) drawing textured, tinted
//! quads through an orthographic camera. `render::reference` reproduces it
//! on the CPU. The window, device and frame loop around it live in
//! `window`, `device` and `core`.

pub mod camera;
pub mod core;
pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod time;
pub mod window;
