//! Unit shapes in local space, centred on the origin with +Y up.
//!
//! Filled shapes are triangle lists, outlines are line lists. The caller's
//! modelview places and sizes them.

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};

pub const TRIANGLE: [Vec2; 3] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.0, 0.5),
];

/// Counter-clockwise from bottom-left.
pub const QUAD: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

/// Texture coordinates of [`QUAD`]: the image's top row maps to the top edge.
pub const QUAD_UV: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
];

pub const QUAD_INDICES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Smallest polygon drawn for a circle.
pub const MIN_CIRCLE_VERTICES: u32 = 3;

#[inline]
pub fn apply(m: &Mat4, p: Vec2) -> Vec2 {
    m.transform_point3(Vec3::new(p.x, p.y, 0.0)).truncate()
}

/// Closed polygon as a line list.
pub fn outline(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    (0..n).flat_map(|i| [points[i], points[(i + 1) % n]]).collect()
}

pub fn quad_triangles() -> Vec<Vec2> {
    QUAD_INDICES.iter().map(|&i| QUAD[i]).collect()
}

/// `vertices` points on a circle of `radius`, starting on +X, counter-clockwise.
pub fn circle_ring(radius: f32, vertices: u32) -> Vec<Vec2> {
    let n = vertices.max(MIN_CIRCLE_VERTICES);
    (0..n)
        .map(|i| {
            let a = TAU * i as f32 / n as f32;
            Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect()
}

/// Fan of triangles around the centre.
pub fn circle_fill(radius: f32, vertices: u32) -> Vec<Vec2> {
    let ring = circle_ring(radius, vertices);
    let n = ring.len();
    (0..n)
        .flat_map(|i| [Vec2::ZERO, ring[i], ring[(i + 1) % n]])
        .collect()
}
