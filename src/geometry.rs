//! Angle math and the shared random primitive
//!
//! Headings are tracked as polar angles in degrees, so reflection works on
//! angles rather than vectors. Screen space: x grows right, y grows down.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

/// Angle of the line from `p0` to `p1` in degrees, range (-180, 180]
#[inline]
pub fn line_angle_degrees(p0: Vec2, p1: Vec2) -> f32 {
    (p1.y - p0.y).atan2(p1.x - p0.x).to_degrees()
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Specular reflection of a heading about a surface tangent
///
/// `2 * surface - incidence`, wrapped to [0, 360).
#[inline]
pub fn reflect_angle(incidence_deg: f32, surface_deg: f32) -> f32 {
    normalize_degrees(2.0 * surface_deg - incidence_deg)
}

/// Uniform draw from `[min, max)`
///
/// `min == max` yields `min`; an inverted range draws from `(max, min]`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Uniform in-place permutation
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
