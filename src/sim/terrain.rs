//! Terrain synthesis
//!
//! A regeneration runs the landing allocator, builds a midpoint-displacement
//! heightfield, flattens the two pads into it, pins both ends to the target
//! height and closes the result into a boundary region. The new profile,
//! region and pads are assembled off to the side and swapped in together.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::ground::Ground;
use super::landing::{AllocatorParams, LandingSpan, LandingZone, allocate_landing_spans};
use super::region::BoundaryRegion;
use crate::config::TerrainConfig;
use crate::error::ConfigResult;
use crate::geometry::{line_angle_degrees, uniform};
use crate::render::{Canvas, Style};

/// Midpoint-displacement heightfield
///
/// Returns `num_points.next_power_of_two() + 1` heights. Both endpoints are
/// seeded within `displace_scale` of `target`; every later pass averages its
/// neighbours and adds noise whose magnitude shrinks by `roughness` per pass.
pub fn midpoint_displacement<R: Rng + ?Sized>(
    rng: &mut R,
    num_points: usize,
    target: f32,
    displace_scale: f32,
    roughness: f32,
) -> Vec<f32> {
    let power = num_points.max(1).next_power_of_two();
    let mut heights = vec![target; power + 1];

    let mut displace = displace_scale;
    heights[0] = target + uniform(rng, -displace, displace);
    heights[power] = target + uniform(rng, -displace, displace);
    displace *= roughness;

    let mut step = power / 2;
    while step >= 1 {
        for j in (step..power).step_by(2 * step) {
            let mid = (heights[j - step] + heights[j + step]) / 2.0;
            heights[j] = mid + uniform(rng, -displace, displace);
        }
        displace *= roughness;
        step /= 2;
    }

    heights
}

/// One complete generation: everything a query needs, built together
#[derive(Debug, Clone, Serialize)]
struct Surface {
    profile: Vec<Vec2>,
    region: BoundaryRegion,
    spans: [LandingSpan; 2],
    max_surface_height: f32,
}

impl Surface {
    fn build<R: Rng + ?Sized>(config: &TerrainConfig, rng: &mut R) -> Self {
        let n = config.num_points;
        let target = config.target_height();
        let segment = config.segment_width();
        // Keep every fractal sample above the closing edge so the polygon
        // stays simple; pad heights are already bounded by validation
        let lowest = TerrainConfig::lowest_surface_y(config.domain_height);

        let spans = allocate_landing_spans(
            &AllocatorParams {
                num_points: n,
                domain_width: config.domain_width,
                flat_height_range: config.landing_height_range,
                min_pad_width: config.min_pad_width,
            },
            rng,
        );

        let heights = midpoint_displacement(
            rng,
            n,
            target,
            config.displace_scale,
            config.roughness,
        );

        let mut profile: Vec<Vec2> = (0..=n)
            .map(|i| {
                let y = spans
                    .iter()
                    .find(|span| span.covers(i))
                    .map_or_else(|| heights[i].clamp(0.0, lowest), |span| span.flat_height);
                Vec2::new(i as f32 * segment, y)
            })
            .collect();

        // Pin the ends so the polygon closes cleanly at the domain edges
        profile[0] = Vec2::new(0.0, target);
        profile[n] = Vec2::new(config.domain_width, target);

        let max_surface_height = profile.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let region = BoundaryRegion::from_profile(&profile, config.domain_height);

        Self {
            profile,
            region,
            spans,
            max_surface_height,
        }
    }
}

/// Fractal terrain with two flat landing pads
/// Serialize-only: a terrain is always built through `generate`
#[derive(Debug, Clone, Serialize)]
pub struct Terrain {
    config: TerrainConfig,
    surface: Surface,
    generation: u64,
}

impl Terrain {
    /// Validate `config` and build the first surface
    pub fn generate<R: Rng + ?Sized>(config: TerrainConfig, rng: &mut R) -> ConfigResult<Self> {
        config.validate()?;
        let surface = Surface::build(&config, rng);
        let terrain = Self {
            config,
            surface,
            generation: 0,
        };
        terrain.log_summary();
        Ok(terrain)
    }

    /// Replace profile, region and pads in one swap
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.surface = Surface::build(&self.config, rng);
        self.generation += 1;
        self.log_summary();
    }

    fn log_summary(&self) {
        let [major, minor] = &self.surface.spans;
        log::info!(
            "Terrain #{}: {} segments, peak y={:.1}, major pad {}..={} @ {:.1}, minor pad {}..={} @ {:.1}",
            self.generation,
            self.config.num_points,
            self.surface.max_surface_height,
            major.start_index,
            major.end_index(),
            major.flat_height,
            minor.start_index,
            minor.end_index(),
            minor.flat_height,
        );
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Number of regenerations since construction
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn target_height(&self) -> f32 {
        self.config.target_height()
    }

    /// Profile samples, strictly increasing in x
    pub fn profile(&self) -> &[Vec2] {
        &self.surface.profile
    }

    pub fn region(&self) -> &BoundaryRegion {
        &self.surface.region
    }

    /// Major pad first, then minor
    pub fn landing_spans(&self) -> &[LandingSpan; 2] {
        &self.surface.spans
    }

    /// Pads in domain coordinates
    pub fn query_landing_zones(&self) -> Vec<LandingZone> {
        let segment = self.config.segment_width();
        self.surface
            .spans
            .iter()
            .map(|span| LandingZone {
                kind: span.kind,
                x: span.start_index as f32 * segment,
                width: span.width as f32 * segment,
                y: span.flat_height,
            })
            .collect()
    }

    /// The pad whose horizontal extent contains `x`, if any
    pub fn landing_span_at(&self, x: f32) -> Option<&LandingSpan> {
        let segment = self.config.segment_width();
        self.surface.spans.iter().find(|span| {
            let start = span.start_index as f32 * segment;
            let end = span.end_index() as f32 * segment;
            x >= start && x <= end
        })
    }

    /// Index of the segment under `x`, clamped to `[0, num_points - 1]`
    pub fn segment_index_at(&self, x: f32) -> usize {
        let last = (self.config.num_points - 1) as f32;
        // NaN falls through the clamp and casts to 0
        (x / self.config.segment_width()).floor().clamp(0.0, last) as usize
    }

    /// Inside the boundary region, or anywhere below the domain bottom
    /// (the implicit floor)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.y >= self.config.domain_height || self.surface.region.contains_point(p)
    }

    pub fn segment_angle_at(&self, x: f32) -> f32 {
        let i = self.segment_index_at(x);
        line_angle_degrees(self.surface.profile[i], self.surface.profile[i + 1])
    }

    pub fn max_surface_height(&self) -> f32 {
        self.surface.max_surface_height
    }

    /// Fill the ground and outline each landing pad
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.fill_polygon(self.surface.region.vertices(), Style::Ground);
        for zone in self.query_landing_zones() {
            canvas.stroke_line(
                Vec2::new(zone.x, zone.y),
                Vec2::new(zone.x + zone.width, zone.y),
                Style::LandingPad,
            );
        }
    }
}

impl Ground for Terrain {
    fn contains_point(&self, p: Vec2) -> bool {
        Terrain::contains_point(self, p)
    }

    fn segment_angle_at(&self, x: f32) -> f32 {
        Terrain::segment_angle_at(self, x)
    }

    fn max_surface_height(&self) -> f32 {
        Terrain::max_surface_height(self)
    }

    fn domain_width(&self) -> f32 {
        self.config.domain_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::render::AsciiCanvas;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn flat_config() -> TerrainConfig {
        TerrainConfig {
            num_points: 8,
            domain_width: 480.0,
            domain_height: 500.0,
            target_height_fraction: 0.8,
            landing_height_range: (400.0, 400.0),
            displace_scale: 0.0,
            roughness: 0.5,
            min_pad_width: 50.0,
        }
    }

    #[test]
    fn test_midpoint_length_and_endpoints() {
        let mut rng = Pcg32::seed_from_u64(1);
        let heights = midpoint_displacement(&mut rng, 20, 300.0, 50.0, 0.6);
        assert_eq!(heights.len(), 33);
        assert!((heights[0] - 300.0).abs() <= 50.0);
        assert!((heights[32] - 300.0).abs() <= 50.0);

        // Exact powers of two are not rounded up
        let heights = midpoint_displacement(&mut rng, 16, 300.0, 50.0, 0.6);
        assert_eq!(heights.len(), 17);
    }

    #[test]
    fn test_midpoint_flat_without_displacement() {
        let mut rng = Pcg32::seed_from_u64(2);
        let heights = midpoint_displacement(&mut rng, 8, 120.0, 0.0, 0.5);
        assert!(heights.iter().all(|&h| h == 120.0));
    }

    #[test]
    fn test_midpoint_bounded_by_geometric_series() {
        let mut rng = Pcg32::seed_from_u64(5);
        let (d, r) = (40.0_f32, 0.5_f32);
        let heights = midpoint_displacement(&mut rng, 64, 0.0, d, r);
        // Endpoints move at most d, each later pass at most d * r^k
        let bound = d / (1.0 - r) + 1e-3;
        assert!(heights.iter().all(|h| h.abs() <= bound));
    }

    #[test]
    fn test_profile_shape() {
        let mut rng = Pcg32::seed_from_u64(42);
        let terrain = Terrain::generate(TerrainConfig::default(), &mut rng).unwrap();
        let profile = terrain.profile();
        let cfg = terrain.config();
        assert_eq!(profile.len(), cfg.num_points + 1);
        assert!(profile.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(profile[0], Vec2::new(0.0, terrain.target_height()));
        assert_eq!(
            profile[cfg.num_points],
            Vec2::new(cfg.domain_width, terrain.target_height())
        );
        assert_eq!(
            terrain.max_surface_height(),
            profile.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
        );
    }

    #[test]
    fn test_pads_are_flat() {
        let mut rng = Pcg32::seed_from_u64(7);
        let terrain = Terrain::generate(TerrainConfig::default(), &mut rng).unwrap();
        for span in terrain.landing_spans() {
            for i in span.start_index..=span.end_index() {
                assert_eq!(terrain.profile()[i].y, span.flat_height);
            }
        }
    }

    #[test]
    fn test_deep_pads_keep_flat_height() {
        // Pads near the ground band with wild fractal noise around them
        let cfg = TerrainConfig {
            landing_height_range: (480.0, 489.0),
            displace_scale: 2000.0,
            ..TerrainConfig::for_domain(480.0, 500.0)
        };
        for seed in 0..20 {
            let terrain = Terrain::generate(cfg.clone(), &mut Pcg32::seed_from_u64(seed)).unwrap();
            let profile = terrain.profile();
            for (zone, span) in terrain.query_landing_zones().iter().zip(terrain.landing_spans()) {
                assert_eq!(profile[span.start_index].y, zone.y);
                for i in span.start_index..=span.end_index() {
                    assert_eq!(profile[i].y, span.flat_height);
                }
            }
        }
    }

    #[test]
    fn test_landing_zones_in_domain_units() {
        let mut rng = Pcg32::seed_from_u64(9);
        let terrain = Terrain::generate(TerrainConfig::default(), &mut rng).unwrap();
        let segment = terrain.config().segment_width();
        let zones = terrain.query_landing_zones();
        assert_eq!(zones.len(), 2);
        for (zone, span) in zones.iter().zip(terrain.landing_spans()) {
            assert_eq!(zone.kind, span.kind);
            assert_eq!(zone.x, span.start_index as f32 * segment);
            assert_eq!(zone.width, span.width as f32 * segment);

            let middle = zone.x + zone.width / 2.0;
            assert_eq!(terrain.landing_span_at(middle), Some(span));
        }
        assert!(terrain.landing_span_at(-10.0).is_none());
    }

    #[test]
    fn test_segment_angle_clamps() {
        let mut rng = Pcg32::seed_from_u64(13);
        let terrain = Terrain::generate(TerrainConfig::default(), &mut rng).unwrap();
        let n = terrain.config().num_points;
        let profile = terrain.profile();

        let first = line_angle_degrees(profile[0], profile[1]);
        let last = line_angle_degrees(profile[n - 1], profile[n]);
        assert_eq!(terrain.segment_angle_at(-500.0), first);
        assert_eq!(terrain.segment_angle_at(0.0), first);
        assert_eq!(terrain.segment_angle_at(terrain.config().domain_width), last);
        assert_eq!(terrain.segment_angle_at(1e9), last);
        assert_eq!(terrain.segment_angle_at(f32::NAN), first);
    }

    #[test]
    fn test_flat_terrain_queries() {
        let mut rng = Pcg32::seed_from_u64(0);
        let terrain = Terrain::generate(flat_config(), &mut rng).unwrap();
        assert!(terrain.profile().iter().all(|p| p.y == 400.0));
        assert_eq!(terrain.max_surface_height(), 400.0);
        assert_eq!(terrain.segment_angle_at(100.0), 0.0);
        assert!(terrain.contains_point(Vec2::new(240.0, 410.0)));
        assert!(!terrain.contains_point(Vec2::new(240.0, 390.0)));
        // Implicit floor below the closing edge, even outside the domain
        assert!(terrain.contains_point(Vec2::new(240.0, 510.0)));
        assert!(terrain.contains_point(Vec2::new(-20.0, 600.0)));
        assert!(!terrain.contains_point(Vec2::new(-20.0, 450.0)));
    }

    #[test]
    fn test_profile_stays_above_floor() {
        let cfg = TerrainConfig {
            displace_scale: 2000.0,
            ..TerrainConfig::default()
        };
        let lowest = TerrainConfig::lowest_surface_y(cfg.domain_height);
        for seed in 0..20 {
            let terrain = Terrain::generate(cfg.clone(), &mut Pcg32::seed_from_u64(seed)).unwrap();
            assert!(terrain.profile().iter().all(|p| p.y >= 0.0 && p.y <= lowest));
        }
    }

    #[test]
    fn test_regenerate_replaces_surface() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut terrain = Terrain::generate(TerrainConfig::default(), &mut rng).unwrap();
        let before = terrain.profile().to_vec();
        terrain.regenerate(&mut rng);
        assert_eq!(terrain.generation(), 1);
        assert_ne!(terrain.profile(), before.as_slice());
        assert_eq!(terrain.region().vertices()[1..=terrain.profile().len()], *terrain.profile());
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = Terrain::generate(TerrainConfig::default(), &mut Pcg32::seed_from_u64(77)).unwrap();
        let b = Terrain::generate(TerrainConfig::default(), &mut Pcg32::seed_from_u64(77)).unwrap();
        assert_eq!(a.profile(), b.profile());
        assert_eq!(a.landing_spans(), b.landing_spans());
    }

    #[test]
    fn test_serializes_snapshot() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut terrain = Terrain::generate(flat_config(), &mut rng).unwrap();
        terrain.regenerate(&mut rng);
        let json = serde_json::to_value(&terrain).unwrap();
        assert_eq!(json["generation"], 1);
        assert_eq!(json["config"]["num_points"], 8);
        let profile = json["surface"]["profile"].as_array().unwrap();
        assert_eq!(profile.len(), 9);
    }

    #[test]
    fn test_rejects_bad_config() {
        let cfg = TerrainConfig {
            num_points: 3,
            ..flat_config()
        };
        let err = Terrain::generate(cfg, &mut Pcg32::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, ConfigError::TooFewPoints { got: 3, min: 4 });
    }

    #[test]
    fn test_draw() {
        let mut rng = Pcg32::seed_from_u64(0);
        let terrain = Terrain::generate(flat_config(), &mut rng).unwrap();
        let mut canvas = AsciiCanvas::new(48, 50, Vec2::new(480.0, 500.0));
        terrain.draw(&mut canvas);
        // Ground fills everything below y=400 (rows 40..50)
        assert_eq!(canvas.get(0, 45), Some('#'));
        assert_eq!(canvas.get(24, 20), Some(' '));
        let text = canvas.render();
        assert!(text.contains('='));
    }

    proptest! {
        #[test]
        fn closure_holds_across_regenerations(seed in any::<u64>(), num_points in 4usize..80) {
            let cfg = TerrainConfig {
                num_points,
                ..TerrainConfig::default()
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut terrain = Terrain::generate(cfg.clone(), &mut rng).unwrap();
            for _ in 0..3 {
                let profile = terrain.profile();
                let target = terrain.target_height();
                prop_assert_eq!(profile[0], Vec2::new(0.0, target));
                prop_assert_eq!(profile[num_points], Vec2::new(cfg.domain_width, target));
                let [major, minor] = terrain.landing_spans();
                prop_assert!(!major.overlaps(minor));
                prop_assert!(major.start_index >= 1 && major.end_index() <= num_points - 1);
                prop_assert!(minor.start_index >= 1 && minor.end_index() <= num_points - 1);
                terrain.regenerate(&mut rng);
            }
        }
    }
}
