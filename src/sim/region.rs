//! Boundary region: the closed polygon of solid ground
//!
//! Built from a terrain profile plus two bottom corners. The profile is
//! fractal and therefore concave, so containment uses an even-odd crossing
//! test rather than anything that assumes convexity.

use glam::Vec2;
use serde::Serialize;

/// A simple closed polygon (last vertex implicitly joins the first)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryRegion {
    vertices: Vec<Vec2>,
    min: Vec2,
    max: Vec2,
}

impl BoundaryRegion {
    /// Close a left-to-right profile down to `floor_y`
    ///
    /// Vertex order: bottom-left, every profile point, bottom-right.
    pub fn from_profile(profile: &[Vec2], floor_y: f32) -> Self {
        let (first_x, last_x) = match (profile.first(), profile.last()) {
            (Some(first), Some(last)) => (first.x, last.x),
            _ => (0.0, 0.0),
        };

        let mut vertices = Vec::with_capacity(profile.len() + 2);
        vertices.push(Vec2::new(first_x, floor_y));
        vertices.extend_from_slice(profile);
        vertices.push(Vec2::new(last_x, floor_y));

        let (min, max) = bounds(&vertices);
        Self { vertices, min, max }
    }

    /// Polygon vertices in drawing order
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Axis-aligned bounds `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.min, self.max)
    }

    /// Whether `p` lies inside the filled region
    pub fn contains_point(&self, p: Vec2) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }
        point_in_polygon(&self.vertices, p)
    }
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

/// Even-odd crossing test against an implicitly closed polygon
///
/// Edges are half-open in y, so a ray through a shared vertex is counted
/// exactly once.
pub fn point_in_polygon(vertices: &[Vec2], p: Vec2) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
