//! The sprite pass: one WGSL program drawing textured, tinted quads.
//!
//! Binding contract:
//! - group 0 binding 0: [`CameraUniform`] (vertex)
//! - group 1 binding 0: 2D float texture (fragment)
//! - group 1 binding 1: filtering sampler (fragment)
//! - vertex locations 0/1/2: position / uv / color ([`SpriteVertex`])

mod batch;
mod contract;
mod pipeline;
mod texture;
mod uniform;
mod vertex;

/// Built-in WGSL source (`vs_main` + `fs_main`).
pub const SPRITE_SHADER: &str = include_str!("shaders/sprite.wgsl");

pub use batch::{DrawRange, SpriteBatch, TextureId, DEFAULT_BATCH_CAPACITY};
pub use contract::{
    validate_shader, ShaderContract, FRAGMENT_ENTRY, SAMPLER_BINDING, TEXTURE_BINDING,
    TEXTURE_GROUP, VERTEX_ENTRY,
};
pub use pipeline::{BlendMode, CameraBinding, SpritePipeline, SpritePipelineConfig};
pub use texture::{
    expand_mask, premultiply_rgba8, AddressMode, FilterMode, SamplerSettings, SpriteTexture,
    TextureColorSpace, TextureDesc,
};
pub use uniform::{CameraUniform, CAMERA_BINDING, CAMERA_GROUP};
pub use vertex::{SpriteVertex, QUAD_INDICES};
