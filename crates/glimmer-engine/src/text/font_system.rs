use std::fmt;
use std::path::Path;

/// Common locations of a sans-serif TrueType font on Linux desktops.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Error returned by [`FontSystem::load_font`] and friends.
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts. Fonts are immutable once loaded.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<FontId, FontLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        let id = self.load_font(&bytes)?;
        log::debug!("loaded font {} as {id:?}", path.display());
        Ok(id)
    }

    /// Loads the first readable font among `paths`.
    pub fn load_first<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<FontId, FontLoadError> {
        for path in paths {
            if let Ok(id) = self.load_file(path) {
                return Ok(id);
            }
        }
        Err(FontLoadError(format!("none of {} candidate font paths could be loaded", paths.len())))
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn missing_paths_report_an_error() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_first(&["/nonexistent/a.ttf", "/nonexistent/b.ttf"]).unwrap_err();
        assert!(err.to_string().contains("2 candidate"));
    }

    #[test]
    fn unknown_id_yields_none() {
        let fonts = FontSystem::new();
        assert!(fonts.get(FontId(3)).is_none());
    }
}
