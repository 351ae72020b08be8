use std::collections::HashMap;

use glam::Vec2;

/// Side of the square glyph atlas texture, in texels.
pub const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

/// Shelf (row) packer: glyphs fill a row left to right, a new row starts below
/// the tallest glyph of the previous one.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    /// Reserves a `w` x `h` cell and returns its top-left texel.
    ///
    /// A cell that could never fit is refused on its own; anything else that
    /// misses marks the packer full until [`reset`](Self::reset).
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * GLYPH_PADDING > self.size || h + 2 * GLYPH_PADDING > self.size {
            log::warn!("glyph {w}x{h} exceeds the {0}x{0} atlas; not drawn", self.size);
            return None;
        }
        if self.full {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_x + w + GLYPH_PADDING > self.size
            || self.cursor_y + h + GLYPH_PADDING > self.size
        {
            log::warn!(
                "glyph atlas is full ({0}x{0}); recycling it after this frame",
                self.size
            );
            self.full = true;
            return None;
        }

        let origin = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(origin)
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.size);
    }
}

/// Rasterisation cache key: font, glyph index and pixel size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphKey {
    pub font: u32,
    pub glyph: u16,
    pub size_bits: u32,
}

impl GlyphKey {
    pub fn new(font: u32, glyph: u16, size: f32) -> Self {
        Self {
            font,
            glyph,
            size_bits: size.to_bits(),
        }
    }
}

/// Atlas region in normalised texture coordinates (V grows downward).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasRegion {
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

/// Texels waiting to be copied into the atlas texture.
#[derive(Debug, Clone)]
pub struct GlyphUpload {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, white with coverage in alpha.
    pub rgba: Vec<u8>,
}

/// CPU side of the glyph atlas.
///
/// Glyphs are packed once per (font, glyph, size) and their texels queued until the
/// renderer next uploads.
#[derive(Debug)]
pub struct GlyphAtlas {
    packer: ShelfPacker,
    regions: HashMap<GlyphKey, Option<AtlasRegion>>,
    pending: Vec<GlyphUpload>,
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphAtlas {
    pub fn new() -> Self {
        Self {
            packer: ShelfPacker::new(ATLAS_SIZE),
            regions: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub fn contains(&self, key: GlyphKey) -> bool {
        self.regions.contains_key(&key)
    }

    /// Cached region of `key`, rasterising through `raster` on first use.
    ///
    /// `raster` returns `(width, height, coverage)`. Empty glyphs and glyphs that
    /// no longer fit are remembered as `None`.
    pub fn region<F>(&mut self, key: GlyphKey, raster: F) -> Option<AtlasRegion>
    where
        F: FnOnce() -> (usize, usize, Vec<u8>),
    {
        if let Some(region) = self.regions.get(&key) {
            return *region;
        }

        let (w, h, coverage) = raster();
        let region = self.insert(w as u32, h as u32, &coverage);
        self.regions.insert(key, region);
        region
    }

    fn insert(&mut self, w: u32, h: u32, coverage: &[u8]) -> Option<AtlasRegion> {
        if w == 0 || h == 0 || coverage.len() < (w * h) as usize {
            return None;
        }
        let (x, y) = self.packer.place(w, h)?;

        let rgba = coverage[..(w * h) as usize]
            .iter()
            .flat_map(|&a| [255, 255, 255, a])
            .collect();
        self.pending.push(GlyphUpload {
            x,
            y,
            width: w,
            height: h,
            rgba,
        });

        let size = ATLAS_SIZE as f32;
        Some(AtlasRegion {
            uv_min: Vec2::new(x as f32 / size, y as f32 / size),
            uv_max: Vec2::new((x + w) as f32 / size, (y + h) as f32 / size),
        })
    }

    /// Hands over every queued upload.
    pub fn take_uploads(&mut self) -> Vec<GlyphUpload> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_full(&self) -> bool {
        self.packer.is_full()
    }

    /// Forgets every cached glyph if the atlas ran out of room.
    ///
    /// Only call between frames: regions handed out earlier become invalid.
    pub fn recycle_if_full(&mut self) -> bool {
        if !self.packer.is_full() {
            return false;
        }
        log::debug!("recycling glyph atlas ({} cached glyphs)", self.regions.len());
        self.packer.reset();
        self.regions.clear();
        self.pending.clear();
        true
    }
}
