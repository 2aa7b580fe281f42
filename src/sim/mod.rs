//! Deterministic simulation module
//!
//! Terrain synthesis and body physics. Everything here is pure and
//! reproducible:
//! - Fixed per-tick physics, no wall-clock time
//! - All randomness through an injected, seedable RNG
//! - No rendering or platform dependencies beyond the `Canvas` seam

pub mod body;
pub mod ground;
pub mod landing;
pub mod region;
pub mod scene;
pub mod terrain;

pub use body::{Body, BodySpawn, BodyState, PositionHistory, SettleReason};
pub use ground::Ground;
pub use landing::{
    IndexSpan, LandingSpan, LandingZone, PadKind, allocate_landing_spans, partition_thirds,
};
pub use region::{BoundaryRegion, point_in_polygon};
pub use scene::Scene;
pub use terrain::{Terrain, midpoint_displacement};
