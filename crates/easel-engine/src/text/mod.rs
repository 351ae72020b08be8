//! Font loading, measurement and glyph atlas management.

mod atlas;
mod font;

use std::path::Path;

use glam::Vec2;

pub use atlas::{AtlasRegion, GlyphAtlas, GlyphKey, GlyphUpload, ShelfPacker, ATLAS_SIZE};
pub use font::{FontFace, PlacedGlyph, vertical_extent};

use crate::error::Result;

/// A textured glyph quad in text-local space (baseline at y = 0, +Y up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub min: Vec2,
    pub max: Vec2,
    pub region: AtlasRegion,
}

/// Current font plus the atlas its glyphs live in.
///
/// Without a font every measurement is 0 and text produces no quads.
#[derive(Default)]
pub struct TextEngine {
    face: Option<FontFace>,
    atlas: GlyphAtlas,
}

impl TextEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font(&mut self, path: &Path, size: f32) -> Result<()> {
        self.face = Some(FontFace::load(path, size)?);
        Ok(())
    }

    /// Changes the size of the current font; ignored when none is set.
    pub fn set_size(&mut self, size: f32) {
        match self.face.as_mut() {
            Some(face) => face.set_size(size),
            None => log::debug!("set_font_size({size}) with no font set"),
        }
    }

    pub fn has_font(&self) -> bool {
        self.face.is_some()
    }

    pub fn width(&self, text: &str) -> f32 {
        self.face.as_ref().map_or(0.0, |f| f.width(text))
    }

    pub fn height(&self, text: &str) -> f32 {
        self.face.as_ref().map_or(0.0, |f| f.height(text))
    }

    /// Lays out `text`, packing any new glyphs into the atlas.
    pub fn quads(&mut self, text: &str) -> Vec<GlyphQuad> {
        let Some(face) = self.face.as_ref() else {
            log::debug!("text {text:?} skipped: no font set");
            return Vec::new();
        };

        let (glyphs, _) = face.layout(text);
        glyphs
            .iter()
            .filter(|g| g.width > 0.0 && g.height > 0.0)
            .filter_map(|g| {
                let region = self.atlas.region(g.key, || face.rasterize(g.key))?;
                Some(GlyphQuad {
                    min: Vec2::new(g.x, g.y),
                    max: Vec2::new(g.x + g.width, g.y + g.height),
                    region,
                })
            })
            .collect()
    }

    pub fn take_uploads(&mut self) -> Vec<GlyphUpload> {
        self.atlas.take_uploads()
    }

    /// Frees the atlas for reuse once it has filled up. Called after each frame.
    pub fn end_frame(&mut self) {
        self.atlas.recycle_if_full();
    }
}
