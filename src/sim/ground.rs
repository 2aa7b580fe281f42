//! Read-only ground queries
//!
//! Bodies only ever see terrain through this trait: containment for
//! collision probes, the local slope for reflection, and the highest
//! surface point as the ground-level threshold.

use glam::Vec2;

pub trait Ground {
    /// Whether `p` is inside solid ground
    fn contains_point(&self, p: Vec2) -> bool;

    /// Slope (degrees) of the surface segment under `x`, clamped to the
    /// nearest valid segment when `x` is outside the domain
    fn segment_angle_at(&self, x: f32) -> f32;

    /// Smallest surface y (the highest point, since y grows downward)
    fn max_surface_height(&self) -> f32;

    /// Horizontal extent; bodies wrap around it
    fn domain_width(&self) -> f32;
}

impl<G: Ground + ?Sized> Ground for &G {
    fn contains_point(&self, p: Vec2) -> bool {
        (**self).contains_point(p)
    }

    fn segment_angle_at(&self, x: f32) -> f32 {
        (**self).segment_angle_at(x)
    }

    fn max_surface_height(&self) -> f32 {
        (**self).max_surface_height()
    }

    fn domain_width(&self) -> f32 {
        (**self).domain_width()
    }
}
