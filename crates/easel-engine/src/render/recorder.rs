use std::ops::Range;

use crate::paint::BlendMode;

use super::texture::TextureSlot;
use super::vertex::Vertex;

/// Primitive assembly of a segment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
}

impl Topology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::Points => wgpu::PrimitiveTopology::PointList,
            Topology::Lines => wgpu::PrimitiveTopology::LineList,
            Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// A contiguous run of vertices drawn with one pipeline and one texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub topology: Topology,
    pub blend: BlendMode,
    pub texture: TextureSlot,
    pub vertices: Range<u32>,
}

/// CPU recording of one frame, in draw order.
///
/// Immediate geometry is appended as it arrives. Points, lines and text wait
/// in their own queues until flushed; a flush appends the queue as a segment
/// using the blend mode current at that moment.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    vertices: Vec<Vertex>,
    segments: Vec<Segment>,
    blend: BlendMode,

    pending_points: Vec<Vertex>,
    pending_lines: Vec<Vertex>,
    pending_text: Vec<Vertex>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// Appends geometry to the frame immediately.
    pub fn draw(&mut self, topology: Topology, texture: TextureSlot, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let end = self.vertices.len() as u32;

        let blend = self.blend;
        if let Some(last) = self.segments.last_mut() {
            if last.topology == topology
                && last.blend == blend
                && last.texture == texture
                && last.vertices.end == start
            {
                last.vertices.end = end;
                return;
            }
        }
        self.segments.push(Segment {
            topology,
            blend,
            texture,
            vertices: start..end,
        });
    }

    pub fn queue_point(&mut self, vertex: Vertex) {
        self.pending_points.push(vertex);
    }

    pub fn queue_line(&mut self, from: Vertex, to: Vertex) {
        self.pending_lines.extend([from, to]);
    }

    /// Queues glyph triangles sampling the atlas.
    pub fn queue_text(&mut self, vertices: &[Vertex]) {
        self.pending_text.extend_from_slice(vertices);
    }

    pub fn flush_points(&mut self) {
        let pending = std::mem::take(&mut self.pending_points);
        self.draw(Topology::Points, TextureSlot::White, &pending);
        self.pending_points = recycle(pending);
    }

    pub fn flush_lines(&mut self) {
        let pending = std::mem::take(&mut self.pending_lines);
        self.draw(Topology::Lines, TextureSlot::White, &pending);
        self.pending_lines = recycle(pending);
    }

    pub fn flush_text(&mut self) {
        let pending = std::mem::take(&mut self.pending_text);
        self.draw(Topology::Triangles, TextureSlot::Glyphs, &pending);
        self.pending_text = recycle(pending);
    }

    pub fn has_pending(&self) -> bool {
        !(self.pending_points.is_empty() && self.pending_lines.is_empty() && self.pending_text.is_empty())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Drops the recorded frame. Queues and blend mode carry over.
    pub fn clear_frame(&mut self) {
        self.vertices.clear();
        self.segments.clear();
    }
}

fn recycle(mut v: Vec<Vertex>) -> Vec<Vertex> {
    v.clear();
    v
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::paint::Color;
    use crate::render::TextureId;

    fn v(x: f32) -> Vertex {
        Vertex::solid(Vec2::new(x, 0.0), Color::WHITE)
    }

    fn xs(r: &FrameRecorder, seg: &Segment) -> Vec<f32> {
        r.vertices()[seg.vertices.start as usize..seg.vertices.end as usize]
            .iter()
            .map(|v| v.pos[0])
            .collect()
    }

    #[test]
    fn queued_points_appear_only_when_flushed() {
        let mut r = FrameRecorder::new();
        r.queue_point(v(1.0));
        assert!(r.segments().is_empty());
        assert!(r.has_pending());

        r.flush_points();
        assert_eq!(r.segments().len(), 1);
        assert_eq!(r.segments()[0].topology, Topology::Points);
        assert!(!r.has_pending());
    }

    #[test]
    fn empty_flush_records_nothing() {
        let mut r = FrameRecorder::new();
        r.flush_points();
        r.flush_lines();
        r.flush_text();
        assert!(r.segments().is_empty());
    }

    #[test]
    fn flush_interleaves_with_immediate_geometry_in_call_order() {
        let mut r = FrameRecorder::new();
        r.queue_point(v(10.0));
        r.flush_points();
        r.draw(Topology::Triangles, TextureSlot::White, &[v(0.0), v(1.0), v(2.0)]);
        r.queue_point(v(40.0));
        r.flush_points();

        let segs = r.segments().to_vec();
        assert_eq!(
            segs.iter().map(|s| s.topology).collect::<Vec<_>>(),
            vec![Topology::Points, Topology::Triangles, Topology::Points]
        );
        assert_eq!(xs(&r, &segs[0]), vec![10.0]);
        assert_eq!(xs(&r, &segs[2]), vec![40.0]);
    }

    #[test]
    fn matching_neighbours_merge() {
        let mut r = FrameRecorder::new();
        r.draw(Topology::Triangles, TextureSlot::White, &[v(0.0), v(1.0), v(2.0)]);
        r.draw(Topology::Triangles, TextureSlot::White, &[v(3.0), v(4.0), v(5.0)]);
        assert_eq!(r.segments().len(), 1);
        assert_eq!(r.segments()[0].vertices, 0..6);

        r.draw(Topology::Triangles, TextureSlot::Image(TextureId(0)), &[v(6.0), v(7.0), v(8.0)]);
        assert_eq!(r.segments().len(), 2);
    }

    #[test]
    fn flushed_batch_uses_blend_at_flush_time() {
        let mut r = FrameRecorder::new();
        r.queue_line(v(0.0), v(1.0));
        r.set_blend(BlendMode::Additive);
        r.flush_lines();
        assert_eq!(r.segments()[0].blend, BlendMode::Additive);
    }

    #[test]
    fn blend_change_splits_segments() {
        let mut r = FrameRecorder::new();
        r.draw(Topology::Lines, TextureSlot::White, &[v(0.0), v(1.0)]);
        r.set_blend(BlendMode::Additive);
        r.draw(Topology::Lines, TextureSlot::White, &[v(2.0), v(3.0)]);
        let blends: Vec<_> = r.segments().iter().map(|s| s.blend).collect();
        assert_eq!(blends, vec![BlendMode::Normal, BlendMode::Additive]);
    }

    #[test]
    fn text_samples_the_glyph_atlas() {
        let mut r = FrameRecorder::new();
        r.queue_text(&[v(0.0), v(1.0), v(2.0)]);
        r.flush_text();
        assert_eq!(r.segments()[0].texture, TextureSlot::Glyphs);
        assert_eq!(r.segments()[0].topology, Topology::Triangles);
    }

    #[test]
    fn clear_frame_keeps_queues_and_blend() {
        let mut r = FrameRecorder::new();
        r.set_blend(BlendMode::Additive);
        r.draw(Topology::Points, TextureSlot::White, &[v(0.0)]);
        r.queue_point(v(1.0));
        r.clear_frame();

        assert!(r.vertices().is_empty());
        assert!(r.segments().is_empty());
        assert!(r.has_pending());
        assert_eq!(r.blend(), BlendMode::Additive);
    }
}
