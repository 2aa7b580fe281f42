//! Rendering abstraction
//!
//! The simulation has no notion of a screen. Anything that can fill a
//! polygon and stroke a line can draw a scene; `AsciiCanvas` is the
//! character-cell implementation used by the native binary.

pub mod ascii;

pub use ascii::AsciiCanvas;

use glam::Vec2;

use crate::sim::Body;

/// What is being drawn, so a canvas can pick its own colors or glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Ground,
    LandingPad,
    Body,
    /// Collision probe points (debug overlay)
    Probe,
    /// Recorded positions (debug overlay)
    Trail,
}

/// A 2D drawing surface in domain coordinates (y grows downward)
pub trait Canvas {
    fn fill_polygon(&mut self, points: &[Vec2], style: Style);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: Style);

    /// Small square marker centered on `at`
    fn fill_marker(&mut self, at: Vec2, style: Style) {
        let corners = rect_corners(at, Vec2::splat(3.0), 0.0);
        self.fill_polygon(&corners, style);
    }
}

/// Corners of a `size` rectangle centered on `center`, rotated by
/// `rotation_deg` (clockwise on screen)
pub fn rect_corners(center: Vec2, size: Vec2, rotation_deg: f32) -> [Vec2; 4] {
    let half = size / 2.0;
    let rot = Vec2::from_angle(rotation_deg.to_radians());
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| center + rot.rotate(corner))
}

/// Draw a body's rotated footprint, plus its probe and trail when `debug`
pub fn draw_body<C: Canvas + ?Sized>(canvas: &mut C, body: &Body, debug: bool) {
    if debug {
        for &p in body.history() {
            canvas.fill_marker(p, Style::Trail);
        }
        for &p in body.last_probe() {
            canvas.fill_marker(p, Style::Probe);
        }
    }
    canvas.fill_polygon(&body.footprint(), Style::Body);
}
