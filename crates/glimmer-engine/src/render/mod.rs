//! GPU rendering: the sprite pass, its CPU reference, and the renderer facade.
//!
//! Conventions:
//! - World space is y-down pixels; [`crate::camera::Camera2D`] maps it to clip space.
//! - Colors and textures are premultiplied unless the pipeline says otherwise.

mod ctx;
mod error;
pub mod reference;
mod renderer;
pub mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::{ContractSite, SpriteError};
pub use renderer::{FrameStats, SpriteRenderer, SpriteRendererConfig};
