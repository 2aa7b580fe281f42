//! Landfall - fractal side-view terrain with bouncing, settling bodies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain synthesis, landing pads, body physics)
//! - `geometry`: Angle math and the shared uniform random primitive
//! - `config`: Construction-time parameters with validation
//! - `render`: Canvas abstraction and a character-cell rasteriser

pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod sim;

pub use config::{BodyConfig, FrictionModel, SceneConfig, TerrainConfig};
pub use error::{ConfigError, ConfigResult};
pub use geometry::{line_angle_degrees, normalize_degrees, reflect_angle, uniform};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (one physics tick per 60 Hz animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Minimum real-world width of a landing pad
    pub const MIN_PAD_WIDTH: f32 = 50.0;
    /// Horizontal spacing used to derive the default sample count
    pub const POINT_SPACING: f32 = 60.0;
    /// Lower bound on the default sample count
    pub const MIN_DEFAULT_POINTS: usize = 20;
    /// Smallest sample count that still splits into three landing thirds
    pub const MIN_POINTS: usize = 4;

    /// Thinnest ground band kept above the domain bottom, as a fraction of height
    pub const MIN_GROUND_FRACTION: f32 = 0.02;
    /// Mean surface elevation as a fraction of domain height
    pub const TARGET_HEIGHT_FRACTION: f32 = 0.85;
    /// Gap between the lowest landing pad and the domain bottom
    pub const LANDING_FLOOR_MARGIN: f32 = 20.0;
    /// Initial midpoint displacement magnitude
    pub const DISPLACE_SCALE: f32 = 100.0;
    /// Per-pass displacement decay
    pub const ROUGHNESS: f32 = 0.75;

    /// Body footprint side length bounds
    pub const BODY_MIN_SIZE: f32 = 10.0;
    pub const BODY_MAX_SIZE: f32 = 30.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.05;
    /// Friction for the largest footprint
    pub const FRICTION_MIN: f32 = 0.01;
    /// Friction for the smallest footprint
    pub const FRICTION_MAX: f32 = 0.7;
    /// Velocity components below this magnitude are zeroed on impact
    pub const VELOCITY_THRESHOLD: f32 = 1.0;
    /// Consecutive collisions tolerated before a grounded body is stopped
    pub const SETTLE_JITTER_THRESHOLD: u32 = 6;
    /// Duplicate history entries tolerated before a grounded body is stopped
    pub const DUPLICATE_THRESHOLD: usize = 4;
    /// Recent positions kept for oscillation detection
    pub const HISTORY_CAPACITY: usize = 20;
    /// Points sampled around the body when probing for contact
    pub const COLLISION_SAMPLES: usize = 5;
    /// Initial heading (degrees, straight down in screen space)
    pub const INITIAL_HEADING: f32 = 90.0;
}
