use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{CanvasError, Result};

use super::atlas::GlyphKey;

/// One laid-out glyph, relative to the pen start on the baseline (+Y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub key: GlyphKey,
    /// Left edge of the bitmap.
    pub x: f32,
    /// Bottom edge of the bitmap; negative for descenders.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

static NEXT_FONT_ID: AtomicU32 = AtomicU32::new(0);

/// A loaded font at the current pixel size.
///
/// Each face gets its own id, so glyphs of two faces never share atlas cells,
/// even when both were read from the same file.
pub struct FontFace {
    font: fontdue::Font,
    id: u32,
    size: f32,
}

impl FontFace {
    /// Reads a TrueType/OpenType file.
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| CanvasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let face = Self::from_bytes(&bytes, size).map_err(|reason| CanvasError::FontLoad {
            path: path.to_path_buf(),
            reason,
        })?;
        log::debug!("loaded font {path:?} at {size}px");
        Ok(face)
    }

    pub fn from_bytes(bytes: &[u8], size: f32) -> std::result::Result<Self, String> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| e.to_string())?;
        let id = NEXT_FONT_ID.fetch_add(1, Ordering::Relaxed);
        Ok(Self { font, id, size })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    /// Lays `text` out on a single line using advances and pair kerning.
    ///
    /// Returns the glyphs (blank ones included) and the final pen position.
    pub fn layout(&self, text: &str) -> (Vec<PlacedGlyph>, f32) {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut prev: Option<char> = None;

        for c in text.chars() {
            if let Some(p) = prev {
                pen += self.font.horizontal_kern(p, c, self.size).unwrap_or(0.0);
            }

            let index = self.font.lookup_glyph_index(c);
            let m = self.font.metrics_indexed(index, self.size);
            glyphs.push(PlacedGlyph {
                key: GlyphKey::new(self.id, index, self.size),
                x: pen + m.xmin as f32,
                y: m.ymin as f32,
                width: m.width as f32,
                height: m.height as f32,
            });

            pen += m.advance_width;
            prev = Some(c);
        }

        (glyphs, pen)
    }

    pub fn width(&self, text: &str) -> f32 {
        self.layout(text).1
    }

    pub fn height(&self, text: &str) -> f32 {
        vertical_extent(&self.layout(text).0)
    }

    /// Coverage bitmap of `key` as `(width, height, bytes)`, rows top to bottom.
    pub fn rasterize(&self, key: GlyphKey) -> (usize, usize, Vec<u8>) {
        let (m, bitmap) = self
            .font
            .rasterize_indexed(key.glyph, f32::from_bits(key.size_bits));
        (m.width, m.height, bitmap)
    }
}

/// Distance from the lowest bitmap edge to the highest; 0 with no inked glyphs.
pub fn vertical_extent(glyphs: &[PlacedGlyph]) -> f32 {
    let mut inked = glyphs.iter().filter(|g| g.width > 0.0 && g.height > 0.0).peekable();
    if inked.peek().is_none() {
        return 0.0;
    }
    let (lo, hi) = inked.fold((f32::MAX, f32::MIN), |(lo, hi), g| {
        (lo.min(g.y), hi.max(g.y + g.height))
    });
    hi - lo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(y: f32, height: f32) -> PlacedGlyph {
        PlacedGlyph {
            key: GlyphKey::new(0, 0, 12.0),
            x: 0.0,
            y,
            width: if height > 0.0 { 5.0 } else { 0.0 },
            height,
        }
    }

    #[test]
    fn extent_spans_descender_to_cap() {
        let glyphs = [glyph(0.0, 10.0), glyph(-3.0, 9.0), glyph(0.0, 0.0)];
        assert_eq!(vertical_extent(&glyphs), 13.0);
    }

    #[test]
    fn blank_text_has_no_extent() {
        assert_eq!(vertical_extent(&[]), 0.0);
        assert_eq!(vertical_extent(&[glyph(0.0, 0.0)]), 0.0);
    }

    #[test]
    fn unreadable_font_file_is_an_io_error() {
        let err = FontFace::load(Path::new("/no/such/font.ttf"), 12.0).err().unwrap();
        assert!(matches!(err, CanvasError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(FontFace::from_bytes(b"not a font", 12.0).is_err());
    }
}
