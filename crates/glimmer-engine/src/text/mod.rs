//! Fonts, the glyph atlas, and text layout for the sprite pass.
//!
//! Glyphs are rasterized by fontdue into an RGBA atlas texture and drawn as
//! ordinary sprite quads tinted with the text color.

mod atlas;
mod font_system;
mod glyph_cache;
mod grid;
mod layout;

pub use atlas::{AtlasPacker, AtlasSlot, ATLAS_PADDING};
pub use font_system::{FontId, FontLoadError, FontSystem, SYSTEM_FONT_PATHS};
pub use glyph_cache::{GlyphCache, DEFAULT_ATLAS_SIZE};
pub use grid::TextGrid;
pub use layout::{layout_text, measure_text, PositionedGlyph, TextAlign, TextStyle};
