use std::path::Path;

use crate::error::{CanvasError, Result};

use super::RenderCtx;

/// Handle to a loaded texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Texture a draw segment samples from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureSlot {
    /// 1x1 white texel; plain colored geometry.
    White,
    /// The glyph atlas.
    Glyphs,
    Image(TextureId),
}

/// GPU texture plus the bind group that samples it.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl GpuTexture {
    /// Creates an RGBA8 texture with its own sampler bound at group 1.
    pub fn new(
        ctx: &RenderCtx<'_>,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        width: u32,
        height: u32,
        address_mode: wgpu::AddressMode,
    ) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self { texture, bind_group }
    }

    /// Copies tightly packed RGBA8 texels into `x, y, width, height`.
    pub fn write(&self, ctx: &RenderCtx<'_>, x: u32, y: u32, width: u32, height: u32, rgba: &[u8]) {
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

struct Entry {
    width: u32,
    height: u32,
    /// Decoded texels until the first upload.
    pixels: Option<Vec<u8>>,
    gpu: Option<GpuTexture>,
}

/// Loaded images. Decoding happens at load time so errors surface
/// immediately; GPU upload waits for the next present.
#[derive(Default)]
pub struct TextureStore {
    entries: Vec<Entry>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<TextureId> {
        let image = image::open(path)
            .map_err(|source| CanvasError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::debug!("loaded texture {path:?} ({width}x{height})");
        Ok(self.insert_rgba(width, height, image.into_raw()))
    }

    pub fn insert_rgba(&mut self, width: u32, height: u32, rgba: Vec<u8>) -> TextureId {
        self.entries.push(Entry {
            width,
            height,
            pixels: Some(rgba),
            gpu: None,
        });
        TextureId((self.entries.len() - 1) as u32)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        (id.0 as usize) < self.entries.len()
    }

    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.entries.get(id.0 as usize).map(|e| (e.width, e.height))
    }

    pub fn has_pending_uploads(&self) -> bool {
        self.entries.iter().any(|e| e.pixels.is_some())
    }

    /// Creates GPU textures for everything loaded since the last call.
    pub fn upload_pending(&mut self, ctx: &RenderCtx<'_>, layout: &wgpu::BindGroupLayout) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let Some(pixels) = entry.pixels.take() else { continue };
            let gpu = GpuTexture::new(
                ctx,
                layout,
                "easel image texture",
                entry.width,
                entry.height,
                wgpu::AddressMode::Repeat,
            );
            gpu.write(ctx, 0, 0, entry.width, entry.height, &pixels);
            log::trace!("uploaded texture {i}");
            entry.gpu = Some(gpu);
        }
    }

    pub fn bind_group(&self, id: TextureId) -> Option<&wgpu::BindGroup> {
        self.entries
            .get(id.0 as usize)
            .and_then(|e| e.gpu.as_ref())
            .map(|g| &g.bind_group)
    }
}
