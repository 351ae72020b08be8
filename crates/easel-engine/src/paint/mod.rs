//! Paint model shared between the canvas and renderers.
//!
//! Scope:
//! - color representation (straight alpha)
//! - blend mode selection

pub mod color;

pub use color::Color;

/// How new fragments combine with the framebuffer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// `src * a + dst * (1 - a)`.
    #[default]
    Normal,
    /// `src * a + dst`; overlapping primitives brighten.
    Additive,
}

impl BlendMode {
    #[inline]
    pub fn from_additive(additive: bool) -> Self {
        if additive { BlendMode::Additive } else { BlendMode::Normal }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::BlendState {
        let dst_factor = match self {
            BlendMode::Normal => wgpu::BlendFactor::OneMinusSrcAlpha,
            BlendMode::Additive => wgpu::BlendFactor::One,
        };
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        }
    }
}
