//! Color model shared by the batcher, text and the host.
//!
//! Tints are linear premultiplied RGBA; see [`Color`].

pub mod color;
pub mod palette;

pub use color::Color;
