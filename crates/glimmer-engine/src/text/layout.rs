use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings};
use glam::Vec2;

use crate::coords::Rect;
use crate::paint::Color;

use super::{FontId, FontSystem};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// `pos.x` is the left edge.
    #[default]
    Left,
    /// Each line is centered on `pos.x`.
    Center,
    /// `pos.x` is the right edge.
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    /// Pixel size of the font.
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    /// Wrap width in pixels; `None` never wraps.
    pub max_width: Option<f32>,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            color: Color::WHITE,
            align: TextAlign::Left,
            max_width: None,
        }
    }
}

/// A glyph bitmap placed in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub key: GlyphRasterConfig,
    pub rect: Rect,
}

/// Lays out `text` with its top-left (for [`TextAlign::Left`]) at `pos`.
///
/// `\n` starts a new line; alignment applies per line. Glyphs without a
/// bitmap (spaces) are omitted. An unknown font yields no glyphs.
pub fn layout_text(
    fonts: &FontSystem,
    font: FontId,
    text: &str,
    pos: Vec2,
    style: &TextStyle,
) -> Vec<PositionedGlyph> {
    run_layout(fonts, font, text, pos, style).0
}

/// Size of the laid-out text block in pixels.
pub fn measure_text(fonts: &FontSystem, font: FontId, text: &str, style: &TextStyle) -> Vec2 {
    run_layout(fonts, font, text, Vec2::ZERO, style).1
}

fn run_layout(
    fonts: &FontSystem,
    font_id: FontId,
    text: &str,
    pos: Vec2,
    style: &TextStyle,
) -> (Vec<PositionedGlyph>, Vec2) {
    let Some(font) = fonts.get(font_id) else {
        log::warn!("layout_text: unknown {font_id:?}");
        return (Vec::new(), Vec2::ZERO);
    };
    let size = style.size.max(1.0);
    let line_size = font
        .horizontal_line_metrics(size)
        .map_or(size * 1.2, |m| m.new_line_size);

    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    let mut glyphs = Vec::new();
    let mut extent = Vec2::ZERO;
    let mut y = pos.y;

    for line in text.split('\n') {
        layout.reset(&LayoutSettings {
            x: 0.0,
            y,
            max_width: style.max_width,
            ..LayoutSettings::default()
        });
        layout.append(&[font], &fontdue::layout::TextStyle::new(line, size, 0));

        // Pen extent, not bitmap extent, so trailing advances count.
        let width = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        let dx = match style.align {
            TextAlign::Left => pos.x,
            TextAlign::Center => pos.x - width * 0.5,
            TextAlign::Right => pos.x - width,
        };

        glyphs.extend(
            layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| PositionedGlyph {
                    key: g.key,
                    rect: Rect::new(g.x + dx, g.y, g.width as f32, g.height as f32),
                }),
        );

        let height = layout.height().max(line_size);
        extent.x = extent.x.max(width);
        extent.y += height;
        y += height;
    }

    (glyphs, extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

    fn fonts() -> (FontSystem, FontId) {
        let mut fonts = FontSystem::new();
        let id = fonts.load_font(TEST_FONT).expect("bundled font parses");
        (fonts, id)
    }

    #[test]
    fn style_builders_set_fields() {
        let s = TextStyle::new(24.0)
            .with_color(Color::BLACK)
            .with_align(TextAlign::Right)
            .with_max_width(100.0);
        assert_eq!(s.size, 24.0);
        assert_eq!(s.color, Color::BLACK);
        assert_eq!(s.align, TextAlign::Right);
        assert_eq!(s.max_width, Some(100.0));
    }

    #[test]
    fn unknown_font_lays_out_nothing() {
        let fonts = FontSystem::new();
        let glyphs = layout_text(&fonts, FontId(0), "hi", Vec2::ZERO, &TextStyle::default());
        assert!(glyphs.is_empty());
    }

    #[test]
    fn spaces_produce_no_glyphs() {
        let (fonts, id) = fonts();
        let glyphs = layout_text(&fonts, id, "a b", Vec2::ZERO, &TextStyle::default());
        assert_eq!(glyphs.len(), 2);
    }

    #[test]
    fn center_alignment_straddles_origin() {
        let (fonts, id) = fonts();
        let style = TextStyle::new(20.0).with_align(TextAlign::Center);
        let glyphs = layout_text(&fonts, id, "HELLO", Vec2::new(100.0, 0.0), &style);
        let left = glyphs.iter().map(|g| g.rect.min().x).fold(f32::MAX, f32::min);
        let right = glyphs.iter().map(|g| g.rect.max().x).fold(f32::MIN, f32::max);
        assert!(left < 100.0 && right > 100.0);
    }

    #[test]
    fn right_alignment_ends_at_origin() {
        let (fonts, id) = fonts();
        let style = TextStyle::new(20.0).with_align(TextAlign::Right);
        let glyphs = layout_text(&fonts, id, "HELLO", Vec2::new(100.0, 0.0), &style);
        let right = glyphs.iter().map(|g| g.rect.max().x).fold(f32::MIN, f32::max);
        assert!(right <= 101.0);
    }

    #[test]
    fn monospace_lines_align_per_line() {
        let (fonts, id) = fonts();
        let style = TextStyle::new(16.0).with_align(TextAlign::Right);
        let size = measure_text(&fonts, id, "ab\nabcd", &style);
        let glyphs = layout_text(&fonts, id, "ab\nabcd", Vec2::new(200.0, 0.0), &style);
        assert_eq!(glyphs.len(), 6);

        // Both lines end at the anchor, so the short line starts further right.
        let first_line_left = glyphs[0].rect.min().x;
        let second_line_left = glyphs[2].rect.min().x;
        assert!(first_line_left > second_line_left);
        assert!(glyphs[2].rect.min().y > glyphs[0].rect.min().y);
        assert!(size.x > 0.0 && size.x <= 200.0);
    }

    #[test]
    fn each_newline_adds_a_line() {
        let (fonts, id) = fonts();
        let style = TextStyle::new(16.0);
        let one = measure_text(&fonts, id, "abc", &style);
        let three = measure_text(&fonts, id, "abc\n\nabc", &style);
        assert_eq!(one.x, three.x);
        assert!(three.y > 2.0 * one.y);
    }
}
