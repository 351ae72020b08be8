use std::path::Path;

use glam::{Mat4, Vec2};

use crate::error::Result;
use crate::paint::{BlendMode, Color};
use crate::text::{ATLAS_SIZE, TextEngine};

use super::geometry::{self, apply};
use super::pipeline::PipelineCache;
use super::recorder::{FrameRecorder, Topology};
use super::texture::{GpuTexture, TextureId, TextureSlot, TextureStore};
use super::vertex::{Vertex, ViewportUniform};
use super::{RenderCtx, RenderTarget};

/// wgpu renderer behind the desktop canvas.
///
/// Draw calls are recorded on the CPU into a [`FrameRecorder`]; [`render`](Self::render)
/// uploads new textures and glyphs, then replays the whole frame in one pass.
pub struct GpuRenderer {
    recorder: FrameRecorder,
    text: TextEngine,
    textures: TextureStore,
    clear_color: Color,

    pipelines: PipelineCache,
    white: Option<GpuTexture>,
    glyphs: Option<GpuTexture>,
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    scratch: Vec<Vertex>,
    warned_no_font: bool,
}

impl Default for GpuRenderer {
    fn default() -> Self {
        Self {
            recorder: FrameRecorder::new(),
            text: TextEngine::new(),
            textures: TextureStore::new(),
            clear_color: Color::BLACK,
            pipelines: PipelineCache::new(),
            white: None,
            glyphs: None,
            viewport_ubo: None,
            viewport_bind_group: None,
            vbo: None,
            vbo_capacity: 0,
            scratch: Vec::new(),
            warned_no_font: false,
        }
    }
}

impl GpuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── frame state ───────────────────────────────────────────────────────

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.recorder.set_blend(mode);
    }

    pub fn recorder(&self) -> &FrameRecorder {
        &self.recorder
    }

    // ── immediate geometry ────────────────────────────────────────────────

    /// Draws `local` (unit-space points) transformed by `modelview`.
    pub fn shape(&mut self, topology: Topology, modelview: &Mat4, color: Color, local: &[Vec2]) {
        self.scratch.clear();
        self.scratch
            .extend(local.iter().map(|&p| Vertex::solid(apply(modelview, p), color)));
        self.recorder.draw(topology, TextureSlot::White, &self.scratch);
    }

    pub fn triangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.shape(Topology::Triangles, modelview, color, &geometry::TRIANGLE);
    }

    pub fn triangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.shape(Topology::Lines, modelview, color, &geometry::outline(&geometry::TRIANGLE));
    }

    pub fn rectangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.shape(Topology::Triangles, modelview, color, &geometry::quad_triangles());
    }

    pub fn rectangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.shape(Topology::Lines, modelview, color, &geometry::outline(&geometry::QUAD));
    }

    pub fn circle_fill(&mut self, modelview: &Mat4, color: Color, radius: f32, vertices: u32) {
        self.shape(Topology::Triangles, modelview, color, &geometry::circle_fill(radius, vertices));
    }

    pub fn circle_outline(&mut self, modelview: &Mat4, color: Color, radius: f32, vertices: u32) {
        let ring = geometry::circle_ring(radius, vertices);
        self.shape(Topology::Lines, modelview, color, &geometry::outline(&ring));
    }

    pub fn sprite(&mut self, modelview: &Mat4, color: Color, texture: TextureId, tiling: Vec2, scroll: Vec2) {
        if !self.textures.contains(texture) {
            log::warn!("sprite: unknown texture {texture:?}");
            return;
        }
        self.scratch.clear();
        self.scratch.extend(geometry::QUAD_INDICES.iter().map(|&i| {
            let uv = geometry::QUAD_UV[i] * tiling + scroll;
            Vertex::new(apply(modelview, geometry::QUAD[i]), uv, color)
        }));
        self.recorder.draw(Topology::Triangles, TextureSlot::Image(texture), &self.scratch);
    }

    // ── batched geometry ──────────────────────────────────────────────────

    pub fn enqueue_point(&mut self, modelview: &Mat4, color: Color) {
        self.recorder.queue_point(Vertex::solid(apply(modelview, Vec2::ZERO), color));
    }

    pub fn enqueue_line(&mut self, color: Color, from: Vec2, to: Vec2) {
        self.recorder
            .queue_line(Vertex::solid(from, color), Vertex::solid(to, color));
    }

    /// Lays out `text` now; the glyph quads are drawn at the next text flush.
    pub fn enqueue_text(&mut self, modelview: &Mat4, color: Color, text: &str) {
        if !self.text.has_font() {
            if !self.warned_no_font {
                log::warn!("text drawn before any font was set; skipping");
                self.warned_no_font = true;
            }
            return;
        }

        let quads = self.text.quads(text);
        if quads.is_empty() {
            return;
        }

        self.scratch.clear();
        for q in quads {
            // Bitmap rows run top to bottom, so the top edge takes uv_min.y.
            let corners = [
                (Vec2::new(q.min.x, q.min.y), Vec2::new(q.region.uv_min.x, q.region.uv_max.y)),
                (Vec2::new(q.max.x, q.min.y), Vec2::new(q.region.uv_max.x, q.region.uv_max.y)),
                (Vec2::new(q.max.x, q.max.y), Vec2::new(q.region.uv_max.x, q.region.uv_min.y)),
                (Vec2::new(q.min.x, q.max.y), Vec2::new(q.region.uv_min.x, q.region.uv_min.y)),
            ];
            self.scratch.extend(geometry::QUAD_INDICES.iter().map(|&i| {
                let (pos, uv) = corners[i];
                Vertex::new(apply(modelview, pos), uv, color)
            }));
        }
        self.recorder.queue_text(&self.scratch);
    }

    pub fn flush_points(&mut self) {
        self.recorder.flush_points();
    }

    pub fn flush_lines(&mut self) {
        self.recorder.flush_lines();
    }

    pub fn flush_text(&mut self) {
        self.recorder.flush_text();
    }

    // ── resources ─────────────────────────────────────────────────────────

    pub fn load_texture(&mut self, path: &Path) -> Result<TextureId> {
        self.textures.load(path)
    }

    pub fn set_font(&mut self, path: &Path, size: f32) -> Result<()> {
        self.text.set_font(path, size)
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.text.set_size(size);
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.text.width(text)
    }

    pub fn text_height(&self, text: &str) -> f32 {
        self.text.height(text)
    }

    // ── GPU replay ────────────────────────────────────────────────────────

    /// Clears the target and draws everything recorded since the last call.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.pipelines.ensure_layouts(ctx);
        self.ensure_bindings(ctx);
        self.upload_resources(ctx);
        self.write_viewport_uniform(ctx);

        let keys: Vec<_> = self
            .recorder
            .segments()
            .iter()
            .map(|s| (s.topology, s.blend))
            .collect();
        for key in keys {
            self.pipelines.ensure_pipeline(ctx, key);
        }

        let vertex_count = self.recorder.vertices().len();
        if vertex_count > 0 {
            self.ensure_vertex_capacity(ctx, vertex_count);
            if let Some(vbo) = self.vbo.as_ref() {
                ctx.queue
                    .write_buffer(vbo, 0, bytemuck::cast_slice(self.recorder.vertices()));
            }
        }

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel canvas pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(vbo), Some(viewport_bg)) = (self.vbo.as_ref(), self.viewport_bind_group.as_ref()) {
                if vertex_count > 0 {
                    rpass.set_bind_group(0, viewport_bg, &[]);
                    rpass.set_vertex_buffer(0, vbo.slice(..));

                    for seg in self.recorder.segments() {
                        let Some(pipeline) = self.pipelines.get((seg.topology, seg.blend)) else {
                            continue;
                        };
                        let bind_group = match seg.texture {
                            TextureSlot::White => self.white.as_ref().map(|t| &t.bind_group),
                            TextureSlot::Glyphs => self.glyphs.as_ref().map(|t| &t.bind_group),
                            TextureSlot::Image(id) => self.textures.bind_group(id),
                        };
                        let Some(bind_group) = bind_group else { continue };

                        rpass.set_pipeline(pipeline);
                        rpass.set_bind_group(1, bind_group, &[]);
                        rpass.draw(seg.vertices.clone(), 0..1);
                    }
                }
            }
        }

        self.recorder.clear_frame();
        self.text.end_frame();
    }

    /// Drops the recorded frame without drawing it.
    pub fn discard_frame(&mut self) {
        self.recorder.clear_frame();
        self.text.end_frame();
    }

    // ── lazy-init helpers ─────────────────────────────────────────────────

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() {
            return;
        }
        let (Some(viewport_layout), Some(texture_layout)) =
            (self.pipelines.viewport_layout(), self.pipelines.texture_layout())
        else {
            return;
        };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let viewport_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel viewport bind group"),
            layout: viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let white = GpuTexture::new(
            ctx,
            texture_layout,
            "easel white texture",
            1,
            1,
            wgpu::AddressMode::ClampToEdge,
        );
        white.write(ctx, 0, 0, 1, 1, &[255; 4]);

        let glyphs = GpuTexture::new(
            ctx,
            texture_layout,
            "easel glyph atlas",
            ATLAS_SIZE,
            ATLAS_SIZE,
            wgpu::AddressMode::ClampToEdge,
        );

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(viewport_bind_group);
        self.white = Some(white);
        self.glyphs = Some(glyphs);
    }

    fn upload_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.textures.has_pending_uploads() {
            if let Some(layout) = self.pipelines.texture_layout() {
                self.textures.upload_pending(ctx, layout);
            }
        }

        let Some(atlas) = self.glyphs.as_ref() else { return };
        for up in self.text.take_uploads() {
            atlas.write(ctx, up.x, up.y, up.width, up.height, &up.rgba);
        }
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let w = ctx.viewport.width.max(1.0);
        let h = ctx.viewport.height.max(1.0);
        ctx.queue.write_buffer(
            ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform { viewport: [w, h], _pad: [0.0; 2] }),
        );
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(1024);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel vertex buffer"),
            size: (new_cap * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn at(x: f32, y: f32, w: f32, h: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, 0.0)) * Mat4::from_scale(Vec3::new(w, h, 1.0))
    }

    #[test]
    fn rectangle_fill_records_two_placed_triangles() {
        let mut r = GpuRenderer::new();
        r.rectangle_fill(&at(50.0, 50.0, 20.0, 10.0), Color::WHITE);

        let verts = r.recorder().vertices();
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[0].pos, [40.0, 45.0]);
        assert_eq!(verts[2].pos, [60.0, 55.0]);
        assert_eq!(r.recorder().segments()[0].topology, Topology::Triangles);
    }

    #[test]
    fn outlines_are_line_lists() {
        let mut r = GpuRenderer::new();
        r.triangle_outline(&Mat4::IDENTITY, Color::WHITE);
        r.circle_outline(&Mat4::IDENTITY, Color::WHITE, 5.0, 12);
        let segs = r.recorder().segments();
        assert_eq!(segs.len(), 1, "adjacent line draws merge");
        assert_eq!(segs[0].topology, Topology::Lines);
        assert_eq!(r.recorder().vertices().len(), 6 + 24);
    }

    #[test]
    fn sprite_uvs_apply_tiling_then_scroll() {
        let mut r = GpuRenderer::new();
        let id = r.textures.insert_rgba(1, 1, vec![255; 4]);
        r.sprite(&Mat4::IDENTITY, Color::WHITE, id, Vec2::new(2.0, 3.0), Vec2::new(0.5, 0.25));

        let verts = r.recorder().vertices();
        assert_eq!(verts.len(), 6);
        // Bottom-left corner samples the bottom-left of the image.
        assert_eq!(verts[0].uv, [0.5, 3.25]);
        // Top-right corner.
        assert_eq!(verts[2].uv, [2.5, 0.25]);
        assert_eq!(r.recorder().segments()[0].texture, TextureSlot::Image(id));
    }

    #[test]
    fn unknown_sprite_texture_draws_nothing() {
        let mut r = GpuRenderer::new();
        r.sprite(&Mat4::IDENTITY, Color::WHITE, TextureId(9), Vec2::ONE, Vec2::ZERO);
        assert!(r.recorder().segments().is_empty());
    }

    #[test]
    fn point_lands_at_modelview_origin_on_flush() {
        let mut r = GpuRenderer::new();
        r.enqueue_point(&Mat4::from_translation(Vec3::new(3.0, 4.0, 0.0)), Color::BLACK);
        assert!(r.recorder().vertices().is_empty());
        r.flush_points();
        assert_eq!(r.recorder().vertices()[0].pos, [3.0, 4.0]);
        assert_eq!(r.recorder().vertices()[0].color, Color::BLACK.to_array());
    }

    #[test]
    fn text_without_font_queues_nothing() {
        let mut r = GpuRenderer::new();
        r.enqueue_text(&Mat4::IDENTITY, Color::WHITE, "hello");
        r.flush_text();
        assert!(r.recorder().segments().is_empty());
        assert_eq!(r.text_width("hello"), 0.0);
    }

    #[test]
    fn discarded_frame_keeps_queued_points() {
        let mut r = GpuRenderer::new();
        r.rectangle_fill(&Mat4::IDENTITY, Color::WHITE);
        r.enqueue_point(&Mat4::IDENTITY, Color::WHITE);
        r.discard_frame();
        assert!(r.recorder().vertices().is_empty());
        r.flush_points();
        assert_eq!(r.recorder().vertices().len(), 1);
    }
}
