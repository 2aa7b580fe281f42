//! Falling bodies
//!
//! Each body integrates gravity and a constant horizontal drift, probes a
//! ring of points around its next position against the ground, bounces by
//! reflecting its heading about the local slope, and eventually settles.
//! Once `Stopped` a body never changes again.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ground::Ground;
use crate::config::BodyConfig;
use crate::consts::INITIAL_HEADING;
use crate::error::{ConfigResult, require_positive, require_unit};
use crate::geometry::{reflect_angle, uniform};
use crate::render::rect_corners;

/// Lifecycle of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    Active,
    /// Terminal: no further updates
    Stopped,
}

/// Which settle heuristic fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettleReason {
    /// Both velocity components damped to zero
    AtRest,
    /// Too many consecutive collision ticks
    Jitter,
    /// Recent positions keep repeating
    Oscillation,
}

/// Bounded log of recent positions, oldest evicted first
#[derive(Debug, Clone, Serialize)]
pub struct PositionHistory {
    samples: VecDeque<Vec2>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, p: Vec2) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(p);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.samples.iter()
    }

    /// Entries whose rounded coordinates repeat an earlier entry
    pub fn duplicate_count(&self) -> usize {
        let distinct: HashSet<(i64, i64)> = self
            .samples
            .iter()
            .map(|p| (p.x.round() as i64, p.y.round() as i64))
            .collect();
        self.samples.len() - distinct.len()
    }
}

/// Explicit starting conditions for a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpawn {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Footprint (width, height)
    pub size: Vec2,
    /// Constant horizontal velocity added every tick
    pub drift_bias: f32,
    pub friction: f32,
    /// Heading in degrees; 90 is straight down
    pub heading: f32,
}

impl BodySpawn {
    /// A body dropped straight down from `position` with no drift
    pub fn at_rest(position: Vec2, size: Vec2, friction: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            drift_bias: 0.0,
            friction,
            heading: INITIAL_HEADING,
        }
    }
}

/// A falling body
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    id: u32,
    size: Vec2,
    gravity: f32,
    friction: f32,
    velocity_threshold: f32,
    drift_bias: f32,
    jitter_threshold: u32,
    duplicate_threshold: usize,
    probe_count: usize,

    position: Vec2,
    velocity: Vec2,
    /// Direction of travel (degrees)
    heading: f32,
    /// Visual spin (degrees)
    rotation: f32,
    state: BodyState,
    settle_reason: Option<SettleReason>,
    consecutive_collisions: u32,
    history: PositionHistory,
    /// Probe points from the most recent tick (debug overlay)
    #[serde(skip)]
    last_probe: Vec<Vec2>,
    ticks: u64,
}

impl Body {
    /// Build a body from explicit starting conditions
    pub fn new(id: u32, config: &BodyConfig, spawn: BodySpawn) -> ConfigResult<Self> {
        config.validate()?;
        require_positive("size.x", spawn.size.x)?;
        require_positive("size.y", spawn.size.y)?;
        require_unit("friction", spawn.friction)?;

        Ok(Self {
            id,
            size: spawn.size,
            gravity: config.gravity,
            friction: spawn.friction,
            velocity_threshold: config.velocity_threshold,
            drift_bias: spawn.drift_bias,
            jitter_threshold: config.settle_jitter_threshold,
            duplicate_threshold: config.duplicate_threshold,
            probe_count: config.collision_samples,
            position: spawn.position,
            velocity: spawn.velocity,
            heading: spawn.heading,
            rotation: 0.0,
            state: BodyState::Active,
            settle_reason: None,
            consecutive_collisions: 0,
            history: PositionHistory::new(config.history_capacity),
            last_probe: Vec::with_capacity(config.collision_samples),
            ticks: 0,
        })
    }

    /// Randomized footprint, friction, drift and drop point near the top of
    /// a `domain_width` wide domain
    pub fn spawn_random<R: Rng + ?Sized>(
        id: u32,
        config: &BodyConfig,
        domain_width: f32,
        rng: &mut R,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let (min_size, max_size) = config.footprint_range;
        let size = Vec2::new(
            uniform(rng, min_size, max_size),
            uniform(rng, min_size, max_size),
        );
        let friction = config
            .friction
            .friction_for(size.x, size.y, config.footprint_range);
        let position = Vec2::new(
            uniform(rng, size.x / 2.0, domain_width - size.x / 2.0),
            size.y,
        );
        let drift_bias = uniform(rng, config.drift_range.0, config.drift_range.1);
        let fall = uniform(
            rng,
            config.initial_fall_speed_range.0,
            config.initial_fall_speed_range.1,
        );

        let body = Self::new(
            id,
            config,
            BodySpawn {
                position,
                velocity: Vec2::new(0.0, fall),
                size,
                drift_bias,
                friction,
                heading: INITIAL_HEADING,
            },
        )?;
        log::debug!(
            "Spawned body {} at ({:.1}, {:.1}), size {:.1}x{:.1}, friction {:.3}, drift {:.2}",
            id,
            position.x,
            position.y,
            size.x,
            size.y,
            friction,
            drift_bias
        );
        Ok(body)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state == BodyState::Stopped
    }

    pub fn settle_reason(&self) -> Option<SettleReason> {
        self.settle_reason
    }

    /// Ticks processed while active
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn consecutive_collisions(&self) -> u32 {
        self.consecutive_collisions
    }

    pub fn history(&self) -> &VecDeque<Vec2> {
        &self.history.samples
    }

    pub fn last_probe(&self) -> &[Vec2] {
        &self.last_probe
    }

    /// Radius of the probe ring: a third of the footprint diagonal
    pub fn probe_radius(&self) -> f32 {
        self.size.length() / 3.0
    }

    /// Rotated footprint corners for rendering
    pub fn footprint(&self) -> [Vec2; 4] {
        rect_corners(self.position, self.size, self.rotation)
    }

    /// Probe points evenly spaced on a ring around `center`, starting at 0 degrees
    fn probe_points(&self, center: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        let radius = self.probe_radius();
        let step = 360.0 / self.probe_count as f32;
        (0..self.probe_count).map(move |i| {
            let angle = (step * i as f32).to_radians();
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
    }

    /// First probe point (in ring order) inside the ground
    fn find_contact<G: Ground + ?Sized>(&mut self, center: Vec2, ground: &G) -> Option<Vec2> {
        let probe: Vec<Vec2> = self.probe_points(center).collect();
        let contact = probe.iter().copied().find(|&p| ground.contains_point(p));
        self.last_probe = probe;
        contact
    }

    #[inline]
    fn damp(&self, v: f32) -> f32 {
        if v.abs() < self.velocity_threshold {
            0.0
        } else {
            v * -self.friction
        }
    }

    /// Advance one step against `ground`; no-op once stopped
    pub fn tick<G: Ground + ?Sized>(&mut self, ground: &G) {
        if self.is_stopped() {
            return;
        }
        self.ticks += 1;

        self.velocity.x = self.drift_bias + self.heading.to_radians().cos();
        self.velocity.y += self.gravity;
        self.rotation += self.velocity.x * self.friction;

        let next = self.position + self.velocity;
        match self.find_contact(next, ground) {
            None => {
                self.position = next;
                self.consecutive_collisions = 0;
                self.history.push(self.position);
            }
            Some(contact) => {
                let surface = ground.segment_angle_at(contact.x);
                self.heading = reflect_angle(self.heading, surface);
                self.velocity = Vec2::new(self.damp(self.velocity.x), self.damp(self.velocity.y));
                self.rotation = surface;
                self.consecutive_collisions += 1;
                // Approximate resolution: may stay slightly embedded until later ticks
                self.position += self.velocity;

                if let Some(reason) = self.settle_check(ground) {
                    self.state = BodyState::Stopped;
                    self.settle_reason = Some(reason);
                    log::debug!(
                        "Body {} settled ({:?}) at ({:.1}, {:.1}) after {} ticks",
                        self.id,
                        reason,
                        self.position.x,
                        self.position.y,
                        self.ticks
                    );
                }
            }
        }

        let width = ground.domain_width();
        if self.position.x > width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = width;
        }
    }

    /// Settle heuristics, evaluated on collision ticks once the bottom of the
    /// probe ring has reached the highest surface point
    fn settle_check<G: Ground + ?Sized>(&self, ground: &G) -> Option<SettleReason> {
        if self.position.y + self.probe_radius() < ground.max_surface_height() {
            return None;
        }
        if self.velocity == Vec2::ZERO {
            Some(SettleReason::AtRest)
        } else if self.consecutive_collisions > self.jitter_threshold {
            Some(SettleReason::Jitter)
        } else if self.history.duplicate_count() > self.duplicate_threshold {
            Some(SettleReason::Oscillation)
        } else {
            None
        }
    }
}
