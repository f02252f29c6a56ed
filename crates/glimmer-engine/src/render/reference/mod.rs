//! CPU rendition of the sprite pass.
//!
//! Mirrors `vs_main`/`fs_main`, the sampler, and the pipeline's blend state
//! so pass output can be checked without a GPU.

mod raster;
mod stages;
mod texture;

pub use raster::{rasterize, DrawState, Framebuffer};
pub use stages::{fragment_stage, vertex_stage, VertexOutput};
pub use texture::CpuTexture;
