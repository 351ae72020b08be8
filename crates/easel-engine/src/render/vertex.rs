use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::paint::Color;

/// Vertex layout shared by every pipeline (32 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0   pixels, origin bottom-left
///  offset  8  uv     [f32; 2]   loc 1
///  offset 16  color  [f32; 4]   loc 2   straight alpha
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    #[inline]
    pub fn new(pos: Vec2, uv: Vec2, color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            uv: uv.to_array(),
            color: color.to_array(),
        }
    }

    /// Vertex sampling the white texel.
    #[inline]
    pub fn solid(pos: Vec2, color: Color) -> Self {
        Self::new(pos, Vec2::ZERO, color)
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

/// Minimum binding size of the viewport uniform.
pub fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}
