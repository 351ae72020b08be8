use glam::Vec2;

use crate::error::CanvasError;
use crate::paint::Color;

/// Horizontal anchoring of text relative to its draw position.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal offset applied to a run of text `width` pixels wide.
    #[inline]
    pub fn offset(self, width: f32) -> f32 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => -width,
        }
    }
}

/// Numeric alignment codes: 0 = left, 1 = center, 2 = right.
impl TryFrom<i32> for TextAlign {
    type Error = CanvasError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TextAlign::Left),
            1 => Ok(TextAlign::Center),
            2 => Ok(TextAlign::Right),
            other => Err(CanvasError::InvalidTextAlign(other)),
        }
    }
}

/// Sprite UV registers shared by every sprite draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteState {
    pub tiling: Vec2,
    pub scroll: Vec2,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            tiling: Vec2::ONE,
            scroll: Vec2::ZERO,
        }
    }
}

/// Registers read by draw calls.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DrawState {
    pub fore_color: Color,
    pub sprite: SpriteState,
    pub text_align: TextAlign,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_codes_map_to_variants() {
        assert_eq!(TextAlign::try_from(0).unwrap(), TextAlign::Left);
        assert_eq!(TextAlign::try_from(1).unwrap(), TextAlign::Center);
        assert_eq!(TextAlign::try_from(2).unwrap(), TextAlign::Right);
    }

    #[test]
    fn out_of_range_alignment_is_rejected() {
        for code in [-1, 3, 42] {
            assert!(matches!(
                TextAlign::try_from(code),
                Err(CanvasError::InvalidTextAlign(c)) if c == code
            ));
        }
    }

    #[test]
    fn offsets_anchor_left_center_right() {
        assert_eq!(TextAlign::Left.offset(80.0), 0.0);
        assert_eq!(TextAlign::Center.offset(80.0), -40.0);
        assert_eq!(TextAlign::Right.offset(80.0), -80.0);
    }

    #[test]
    fn defaults_match_fresh_window() {
        let s = DrawState::default();
        assert_eq!(s.fore_color, Color::WHITE);
        assert_eq!(s.sprite.tiling, Vec2::ONE);
        assert_eq!(s.sprite.scroll, Vec2::ZERO);
        assert_eq!(s.text_align, TextAlign::Left);
    }
}
