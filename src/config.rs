//! Construction-time parameters
//!
//! Every struct is serde-friendly with `#[serde(default)]`, so a JSON file
//! only needs the fields it overrides. `validate()` is the single gate for
//! malformed values; terrain, bodies and scenes call it on construction.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{
    ConfigError, ConfigResult, require_finite, require_ordered, require_positive, require_unit,
};

/// Terrain synthesis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of profile segments (the profile has `num_points + 1` samples)
    pub num_points: usize,
    /// Horizontal extent of the domain
    pub domain_width: f32,
    /// Vertical extent; the boundary region closes along `y = domain_height`
    pub domain_height: f32,
    /// Mean surface elevation as a fraction of `domain_height`
    pub target_height_fraction: f32,
    /// `(min, max)` y values a landing pad may be flattened to
    pub landing_height_range: (f32, f32),
    /// Initial midpoint displacement magnitude
    pub displace_scale: f32,
    /// Per-pass displacement decay, in (0, 1)
    pub roughness: f32,
    /// Minimum real-world pad width
    pub min_pad_width: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::for_domain(960.0, 540.0)
    }
}

impl TerrainConfig {
    /// Classic defaults scaled to a domain size
    pub fn for_domain(width: f32, height: f32) -> Self {
        let target = height * TARGET_HEIGHT_FRACTION;
        let num_points =
            ((width / POINT_SPACING).round().max(0.0) as usize).max(MIN_DEFAULT_POINTS);
        // Short domains put the floor margin above the target height
        let lowest = Self::lowest_surface_y(height).max(0.0);
        let a = target.clamp(0.0, lowest);
        let b = (height - LANDING_FLOOR_MARGIN).clamp(0.0, lowest);
        Self {
            num_points,
            domain_width: width,
            domain_height: height,
            target_height_fraction: TARGET_HEIGHT_FRACTION,
            landing_height_range: (a.min(b), a.max(b)),
            displace_scale: DISPLACE_SCALE,
            roughness: ROUGHNESS,
            min_pad_width: MIN_PAD_WIDTH,
        }
    }

    /// Mean surface elevation in domain units
    #[inline]
    pub fn target_height(&self) -> f32 {
        self.domain_height * self.target_height_fraction
    }

    /// Deepest y a surface sample may take in a `height` tall domain
    #[inline]
    pub fn lowest_surface_y(height: f32) -> f32 {
        height * (1.0 - MIN_GROUND_FRACTION)
    }

    /// Horizontal distance between adjacent profile samples
    #[inline]
    pub fn segment_width(&self) -> f32 {
        self.domain_width / self.num_points as f32
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_points < MIN_POINTS {
            return Err(ConfigError::TooFewPoints {
                got: self.num_points,
                min: MIN_POINTS,
            });
        }
        require_positive("domain_width", self.domain_width)?;
        require_positive("domain_height", self.domain_height)?;
        require_unit("target_height_fraction", self.target_height_fraction)?;
        require_ordered("landing_height_range", self.landing_height_range)?;
        let lowest = Self::lowest_surface_y(self.domain_height);
        let (low, high) = self.landing_height_range;
        if low < 0.0 || high > lowest {
            return Err(ConfigError::OutOfDomain {
                field: "landing_height_range",
                min: low,
                max: high,
                limit: lowest,
            });
        }
        require_finite("displace_scale", self.displace_scale)?;
        require_unit("roughness", self.roughness)?;
        require_positive("min_pad_width", self.min_pad_width)?;
        Ok(())
    }
}

/// How a body's friction coefficient is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum FrictionModel {
    /// Every body uses the same coefficient
    Fixed { value: f32 },
    /// Interpolated by footprint area: the largest footprint gets `min`,
    /// the smallest gets `max`
    ByFootprint { min: f32, max: f32 },
}

impl Default for FrictionModel {
    fn default() -> Self {
        FrictionModel::ByFootprint {
            min: FRICTION_MIN,
            max: FRICTION_MAX,
        }
    }
}

impl FrictionModel {
    /// Friction for a `width x height` footprint drawn from `footprint_range`
    pub fn friction_for(&self, width: f32, height: f32, footprint_range: (f32, f32)) -> f32 {
        match *self {
            FrictionModel::Fixed { value } => value,
            FrictionModel::ByFootprint { min, max } => {
                let (small, large) = footprint_range;
                let largest = large * large;
                let smallest = small * small;
                if largest == smallest {
                    return (min + max) / 2.0;
                }
                // 0 at the largest area, 1 at the smallest
                let t = ((width * height - largest) / (smallest - largest)).clamp(0.0, 1.0);
                min + (max - min) * t
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match *self {
            FrictionModel::Fixed { value } => require_unit("friction", value),
            FrictionModel::ByFootprint { min, max } => {
                require_unit("friction.min", min)?;
                require_unit("friction.max", max)?;
                require_ordered("friction", (min, max))
            }
        }
    }
}

/// Body physics parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// `(min, max)` footprint side length
    pub footprint_range: (f32, f32),
    /// Downward acceleration per tick
    pub gravity: f32,
    pub friction: FrictionModel,
    /// Velocity components below this magnitude are zeroed on impact
    pub velocity_threshold: f32,
    /// Consecutive collision ticks tolerated before settling
    pub settle_jitter_threshold: u32,
    /// Duplicate rounded positions tolerated before settling
    pub duplicate_threshold: usize,
    /// Recent positions kept for oscillation detection
    pub history_capacity: usize,
    /// Probe points sampled around the body each tick
    pub collision_samples: usize,
    /// `(min, max)` constant horizontal drift
    pub drift_range: (f32, f32),
    /// `(min, max)` initial vertical velocity
    pub initial_fall_speed_range: (f32, f32),
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            footprint_range: (BODY_MIN_SIZE, BODY_MAX_SIZE),
            gravity: GRAVITY,
            friction: FrictionModel::default(),
            velocity_threshold: VELOCITY_THRESHOLD,
            settle_jitter_threshold: SETTLE_JITTER_THRESHOLD,
            duplicate_threshold: DUPLICATE_THRESHOLD,
            history_capacity: HISTORY_CAPACITY,
            collision_samples: COLLISION_SAMPLES,
            drift_range: (-10.0, 10.0),
            initial_fall_speed_range: (-10.0, 4.0),
        }
    }
}

impl BodyConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("footprint_range.min", self.footprint_range.0)?;
        require_ordered("footprint_range", self.footprint_range)?;
        require_finite("gravity", self.gravity)?;
        self.friction.validate()?;
        require_finite("velocity_threshold", self.velocity_threshold)?;
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCount {
                field: "history_capacity",
            });
        }
        if self.collision_samples == 0 {
            return Err(ConfigError::ZeroCount {
                field: "collision_samples",
            });
        }
        require_ordered("drift_range", self.drift_range)?;
        require_ordered("initial_fall_speed_range", self.initial_fall_speed_range)?;
        Ok(())
    }
}

/// Everything needed to build a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub body: BodyConfig,
    /// Bodies spawned when the scene is populated
    pub body_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            body: BodyConfig::default(),
            body_count: 12,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SceneConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.terrain.validate()?;
        self.body.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
        assert!(BodyConfig::default().validate().is_ok());
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_for_domain() {
        let cfg = TerrainConfig::for_domain(1920.0, 1000.0);
        assert_eq!(cfg.num_points, 32);
        assert!((cfg.target_height() - 850.0).abs() < 1e-3);
        assert!((cfg.landing_height_range.0 - 850.0).abs() < 1e-3);
        assert_eq!(cfg.landing_height_range.1, 980.0);

        // Narrow domains still get the minimum sample count
        let cfg = TerrainConfig::for_domain(300.0, 200.0);
        assert_eq!(cfg.num_points, MIN_DEFAULT_POINTS);
    }

    #[test]
    fn test_for_domain_short_heights_stay_valid() {
        // Below ~133 units the floor margin sits above the target height
        let cfg = TerrainConfig::for_domain(480.0, 100.0);
        let (low, high) = cfg.landing_height_range;
        assert!(low <= high);
        assert!((low - 80.0).abs() < 1e-3);
        assert!((high - 85.0).abs() < 1e-3);
        assert!(cfg.validate().is_ok());

        for height in [10.0, 50.0, 120.0, 130.0, 133.0, 140.0, 540.0] {
            let cfg = TerrainConfig::for_domain(480.0, height);
            assert!(cfg.validate().is_ok(), "height {height}: {:?}", cfg.validate());
        }
    }

    #[test]
    fn test_rejects_landing_range_outside_domain() {
        let cfg = TerrainConfig {
            domain_height: 500.0,
            landing_height_range: (495.0, 499.0),
            ..TerrainConfig::for_domain(480.0, 500.0)
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfDomain {
                field: "landing_height_range",
                ..
            })
        ));

        let cfg = TerrainConfig {
            landing_height_range: (-5.0, 100.0),
            ..TerrainConfig::for_domain(480.0, 500.0)
        };
        assert!(cfg.validate().is_err());

        // Just above the thinnest ground band is fine
        let cfg = TerrainConfig {
            landing_height_range: (400.0, 489.0),
            ..TerrainConfig::for_domain(480.0, 500.0)
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_terrain() {
        let cfg = TerrainConfig {
            num_points: 2,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooFewPoints { got: 2, min: MIN_POINTS })
        );

        let cfg = TerrainConfig {
            domain_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { field: "domain_width", .. })
        ));

        let cfg = TerrainConfig {
            roughness: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfUnitRange { field: "roughness", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_body() {
        let cfg = BodyConfig {
            friction: FrictionModel::Fixed { value: 1.2 },
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfUnitRange { field: "friction", .. })
        ));

        let cfg = BodyConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroCount { field: "history_capacity" })
        );

        let cfg = BodyConfig {
            footprint_range: (30.0, 10.0),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn test_friction_by_footprint() {
        let model = FrictionModel::default();
        let range = (10.0, 30.0);
        assert!((model.friction_for(30.0, 30.0, range) - FRICTION_MIN).abs() < 1e-6);
        assert!((model.friction_for(10.0, 10.0, range) - FRICTION_MAX).abs() < 1e-6);
        let mid = model.friction_for(20.0, 20.0, range);
        assert!(mid > FRICTION_MIN && mid < FRICTION_MAX);

        let fixed = FrictionModel::Fixed { value: 0.3 };
        assert_eq!(fixed.friction_for(12.0, 25.0, range), 0.3);
    }

    #[test]
    fn test_json_partial_override() {
        let json = r#"{
            "terrain": { "num_points": 8, "domain_width": 480.0 },
            "body": { "gravity": 0.1, "friction": { "model": "fixed", "value": 0.4 } },
            "body_count": 3
        }"#;
        let cfg = SceneConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.terrain.num_points, 8);
        assert_eq!(cfg.terrain.domain_width, 480.0);
        assert_eq!(cfg.terrain.roughness, ROUGHNESS);
        assert_eq!(cfg.body.gravity, 0.1);
        assert_eq!(cfg.body.friction, FrictionModel::Fixed { value: 0.4 });
        assert_eq!(cfg.body_count, 3);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SceneConfig::from_json_str(r#"{ "terrain": { "num_points": 1 } }"#),
            Err(ConfigError::TooFewPoints { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = SceneConfig::default();
        let back = SceneConfig::from_json_str(&cfg.to_json_string()).unwrap();
        assert_eq!(cfg, back);
    }
}
